/*
[INPUT]:  Error sources (HTTP transport, API responses, serialization, URLs)
[OUTPUT]: Structured error types with server messages and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Taskboard adapter
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// API returned a non-success status
    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Http(err)
        }
    }
}

impl ApiError {
    /// Message supplied by the server in the error body, if any.
    ///
    /// Only `Api` errors carry one; transport failures never do.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Check if error means the caller has no valid session
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED.as_u16()
                    || *status == StatusCode::FORBIDDEN.as_u16()
        )
    }

    /// Create an API error from status code and optional server message
    pub fn api_error(status: StatusCode, message: Option<String>) -> Self {
        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, ApiError>;
