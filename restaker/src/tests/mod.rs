pub mod common;
pub mod notify;
pub mod policy;
pub mod service;
