//! Enumerates errors raised by proof engines.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProofEngineError {
    #[error("Invalid argument: `{0}`")]
    InvalidArgument(String),
    #[error("Invalid state: `{0}`")]
    InvalidState(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("IO error: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Cancelled")]
    Cancelled,
    #[error("{0}")]
    Other(String),
}
