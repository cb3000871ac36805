//! Remote API abstraction.

use ludex_protocol::{EditConflict, GameRecord};
use std::sync::Mutex;
use thiserror::Error;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the remote API.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response (network down, connection
    /// refused, ...).
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("server returned status {code}: {message}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body or status text.
        message: String,
    },

    /// An update was rejected because the server-side version advanced.
    /// Carries both copies so the caller can resolve the conflict.
    #[error("version conflict")]
    Conflict(Box<EditConflict>),

    /// The response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built (e.g. update without an id).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns true if the failure happened before any server decision,
    /// i.e. the case the fail-silent policy is allowed to mask.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

/// The remote CRUD surface for game records.
///
/// This trait abstracts the network layer, allowing different
/// implementations (HTTP, mock for testing, ...).
pub trait GameApi: Send + Sync {
    /// Lists all records visible to the client.
    fn list(&self) -> ApiResult<Vec<GameRecord>>;

    /// Creates a record (no id) and returns the persisted copy.
    fn create(&self, record: &GameRecord) -> ApiResult<GameRecord>;

    /// Updates a record by its id and returns the persisted copy.
    ///
    /// A version conflict is reported as [`ApiError::Conflict`].
    fn update(&self, record: &GameRecord) -> ApiResult<GameRecord>;

    /// Deletes the record with the given id. No response body is required.
    fn delete_by_id(&self, id: i64) -> ApiResult<()>;
}

/// A mock API for testing.
///
/// Responses are set per call; an unset response behaves like a transport
/// failure, so a freshly-created mock acts as an unreachable backend.
#[derive(Debug, Default)]
pub struct MockApi {
    list_response: Mutex<Option<ApiResult<Vec<GameRecord>>>>,
    create_response: Mutex<Option<ApiResult<GameRecord>>>,
    update_response: Mutex<Option<ApiResult<GameRecord>>>,
    delete_response: Mutex<Option<ApiResult<()>>>,
}

impl MockApi {
    /// Creates a mock with no responses set (everything fails as if
    /// offline).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list response.
    pub fn set_list_response(&self, response: ApiResult<Vec<GameRecord>>) {
        *self.list_response.lock().unwrap() = Some(response);
    }

    /// Sets the create response.
    pub fn set_create_response(&self, response: ApiResult<GameRecord>) {
        *self.create_response.lock().unwrap() = Some(response);
    }

    /// Sets the update response.
    pub fn set_update_response(&self, response: ApiResult<GameRecord>) {
        *self.update_response.lock().unwrap() = Some(response);
    }

    /// Sets the delete response.
    pub fn set_delete_response(&self, response: ApiResult<()>) {
        *self.delete_response.lock().unwrap() = Some(response);
    }

    fn unreachable_backend() -> ApiError {
        ApiError::transport("no mock response set")
    }
}

impl GameApi for MockApi {
    fn list(&self) -> ApiResult<Vec<GameRecord>> {
        self.list_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(Self::unreachable_backend()))
    }

    fn create(&self, _record: &GameRecord) -> ApiResult<GameRecord> {
        self.create_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(Self::unreachable_backend()))
    }

    fn update(&self, _record: &GameRecord) -> ApiResult<GameRecord> {
        self.update_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(Self::unreachable_backend()))
    }

    fn delete_by_id(&self, _id: i64) -> ApiResult<()> {
        self.delete_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(Self::unreachable_backend()))
    }
}
