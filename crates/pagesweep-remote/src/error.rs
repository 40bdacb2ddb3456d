//! Error types for remote API calls.

use thiserror::Error;

/// Result type alias for remote operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("invalid endpoint URL: {0}")]
    Url(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unparsable response: {0}")]
    Parse(String),

    #[error("remote reported failure: {0}")]
    Rejected(String),
}
