//! Error types for news research operations

use agent_utils::ConfigError;
use thiserror::Error;

/// News research specific errors
#[derive(Debug, Error)]
pub enum NewsError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upstream API answered with something unusable
    #[error("API error: {0}")]
    Api(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Task template failed to render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Agent execution failed
    #[error(transparent)]
    Agent(#[from] agent_core::Error),
}

impl NewsError {
    /// Whether this error belongs to the timeout class
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Agent(e) => e.is_timeout(),
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Result type alias for news operations
pub type Result<T> = std::result::Result<T, NewsError>;

/// Convert NewsError to agent_core::Error, keeping the timeout class
impl From<NewsError> for agent_core::Error {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::Agent(inner) => inner,
            other if other.is_timeout() => Self::Timeout(other.to_string()),
            other => Self::ProcessingFailed(other.to_string()),
        }
    }
}
