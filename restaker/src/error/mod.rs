use thiserror::Error;

use crate::config::ConfigError;
use crate::core::chain::ChainError;
use crate::core::history::HistoryError;
use crate::core::signer::CredentialError;

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Error types for the agent
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Chain error: {0}")]
    ChainError(#[from] ChainError),

    #[error("History error: {0}")]
    HistoryError(#[from] HistoryError),

    #[error("Credential error: {0}")]
    CredentialError(#[from] CredentialError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// A pass for this wallet is still in flight
    #[error("A maintenance pass is already running")]
    AlreadyRunning,

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Run Command Error: {0}")]
    RunCommandError(String),
}

impl AgentError {
    /// Failures that happened before anything could be attempted on-chain.
    pub fn is_abort(&self) -> bool {
        matches!(self, AgentError::ChainError(e) if e.aborts_pass())
    }
}
