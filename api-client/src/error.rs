use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while talking to the content backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Error body some backend endpoints send alongside a failure status
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default, alias = "title", alias = "error")]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ApiError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout(_) | ApiError::Transport(_) => true,
            ApiError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get error code for the error type
    pub fn error_code(&self) -> &str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Http { .. } => "HTTP_ERROR",
            ApiError::Timeout(_) => "TIMEOUT",
            ApiError::Transport(_) => "NETWORK_ERROR",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::InvalidUrl(_) => "INVALID_URL",
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<content::ContentError> for ApiError {
    fn from(err: content::ContentError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;
