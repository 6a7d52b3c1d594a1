//! Error type for calls against the remote store and remote functions.
//!
//! Every remote failure (transport, rejected write, bad response body) is
//! reported as one kind. The status and code are carried through for logging
//! but callers never branch on them.

use thiserror::Error;

/// A remote call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote call failed: {message}")]
pub struct RemoteError {
    /// Message reported by the remote side (or by the transport).
    pub message: String,
    /// HTTP status, when the call reached the remote service.
    pub status: Option<u16>,
    /// Backend-specific error code (e.g. a Postgres SQLSTATE).
    pub code: Option<String>,
}

/// Result type for remote calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            code: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        let err = RemoteError::new(e.to_string());
        match e.status() {
            Some(status) => err.with_status(status.as_u16()),
            None => err,
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::new(format!("malformed payload: {}", e))
    }
}

impl From<url::ParseError> for RemoteError {
    fn from(e: url::ParseError) -> Self {
        RemoteError::new(format!("invalid endpoint URL: {}", e))
    }
}
