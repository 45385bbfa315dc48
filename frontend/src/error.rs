//! Client error type.

use thiserror::Error;

/// Failure of any client-side operation.
///
/// Each variant resolves to a recoverable UI state; nothing here is fatal.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the session. The session has already been cleared
    /// and the login route requested by the time callers see this.
    #[error("Unauthorized")]
    Unauthorized,
    /// Non-2xx response, carrying the server's message when it sent one.
    #[error("{0}")]
    RequestFailed(String),
    /// Image upload returned a non-2xx status.
    #[error("Upload failed")]
    UploadFailed,
    /// The requested record does not exist or could not be loaded.
    #[error("Not found")]
    NotFound,
    /// Client-side checks blocked the operation before any network call.
    #[error("{0}")]
    ValidationFailed(String),
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),
    /// The response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Decode(#[from] serde_json::Error),
    /// The session store could not be written.
    #[error("Session storage error: {0}")]
    Storage(String),
}

/// Result alias used across the client layer.
pub type ApiResult<T> = Result<T, ApiError>;
