use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

pub type ChainResult<T> = Result<T, ChainError>;

#[derive(Error, Debug)]
pub enum ChainError {
    /// The endpoint could not be reached or dropped the request.
    #[error("RPC endpoint unreachable: {0}")]
    Connection(String),

    /// The node answered but the call reverted or returned something unusable.
    #[error("Contract read failed: {0}")]
    Read(String),

    #[error("Connected to chain id {actual}, expected {expected}")]
    WrongChain { expected: u64, actual: u64 },

    /// The node refused a broadcast transaction.
    #[error("Transaction rejected: {0}")]
    Submission(String),
}

impl ChainError {
    /// Maps a transport failure onto the read taxonomy.
    pub fn from_read(err: RpcError<TransportErrorKind>) -> Self {
        match err {
            RpcError::Transport(kind) => ChainError::Connection(kind.to_string()),
            other => ChainError::Read(other.to_string()),
        }
    }

    pub fn from_contract(err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(e) => Self::from_read(e),
            other => ChainError::Read(other.to_string()),
        }
    }

    /// Maps a broadcast failure. Unreachable endpoints stay connection errors.
    pub fn from_submission(err: RpcError<TransportErrorKind>) -> Self {
        match err {
            RpcError::Transport(kind) => ChainError::Connection(kind.to_string()),
            other => ChainError::Submission(other.to_string()),
        }
    }

    /// True for failures where nothing on-chain could have been attempted.
    pub fn aborts_pass(&self) -> bool {
        matches!(self, ChainError::Connection(_) | ChainError::Read(_) | ChainError::WrongChain { .. })
    }
}
