//! Error types for protocol encoding and decoding.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur when encoding or decoding protocol values.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A message had a recognized shape but invalid content.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl ProtocolError {
    /// Creates an invalid-message error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidMessage(message.into())
    }
}
