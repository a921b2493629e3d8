pub mod agent;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod service;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use error::{AgentError, AgentResult};
