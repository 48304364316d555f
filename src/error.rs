//! Error types for the replay subscription layer.

use thiserror::Error;

/// Main error type for session and subscription operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Instance URL is not configured")]
    MissingInstanceUrl,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Replay store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        ReplayError::Serialization(e.to_string())
    }
}

/// Result type for replay operations.
pub type Result<T> = std::result::Result<T, ReplayError>;
