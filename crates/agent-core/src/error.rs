//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
///
/// `Timeout` is kept apart from the other variants because callers retry
/// timeouts and give up on everything else.
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// An upstream call exceeded its deadline
    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl Error {
    /// Whether this error belongs to the timeout class
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
