//! Error types for the todo client.
//!
//! Every non-expected status code is an `UnexpectedStatus`, including 404.
//! Callers that care about "does not exist" use `ApiError::is_not_found`.

use thiserror::Error;
use ureq::http::StatusCode;

/// Boxed error produced by a `Transport` implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `TodoClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    /// Connecting, sending, or reading the response failed.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The server answered with a status other than the one the operation expects.
    #[error("{}", status_line(.status))]
    UnexpectedStatus {
        expected: u16,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded into the expected type.
    #[error("failed to decode response body: {0}")]
    Decoding(#[source] serde_json::Error),
}

impl ApiError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        ApiError::Transport(err.into())
    }

    /// Status code of an `UnexpectedStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// `response status of 404 Not Found`; the reason phrase is omitted for
/// codes without a canonical one.
fn status_line(status: &u16) -> String {
    match StatusCode::from_u16(*status)
        .ok()
        .and_then(|code| code.canonical_reason())
    {
        Some(reason) => format!("response status of {status} {reason}"),
        None => format!("response status of {status}"),
    }
}
