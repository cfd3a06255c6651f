//! Error types for finview-client

use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized (check the session token)")]
    Unauthorized,

    #[error("Request failed with status {status}")]
    Status { status: u16 },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(401) | ureq::Error::StatusCode(403) => ApiError::Unauthorized,
            ureq::Error::StatusCode(status) => ApiError::Status { status },
            other => ApiError::Transport {
                message: other.to_string(),
            },
        }
    }
}

/// Result type with ApiError
pub type ApiResult<T> = Result<T, ApiError>;
