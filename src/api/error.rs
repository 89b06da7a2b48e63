use serde_json::Value;
use thiserror::Error;

/// Client-facing error taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure before a response was obtained; not retried.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response other than 401, with the parsed body when available.
    #[error("request failed with status {status}")]
    Status { status: u16, body: Option<Value> },

    /// Token refresh failed, or a retried request was rejected again.
    /// Callers should force a logged-out state on this error.
    #[error("session expired")]
    SessionExpired,

    /// A mutation was attempted while connectivity is marked offline.
    #[error("offline")]
    Offline,

    /// The injected key-value storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A payload could not be encoded or decoded against its DTO.
    #[error("codec error: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status for `Status` errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
