//! Error types for the sync engine.

use crate::api::ApiError;
use ludex_protocol::ProtocolError;
use ludex_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote API call failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// The local store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Encoding or decoding a record failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The push channel transport failed.
    #[error("push transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The operation was cancelled before its result was committed.
    #[error("operation cancelled")]
    Cancelled,
}
