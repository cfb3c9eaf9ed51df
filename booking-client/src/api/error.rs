//! Booking API error types.

use crate::domain::DomainError;

/// Errors from talking to the booking service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, DNS, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No response within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Non-2xx response without a usable `detail` message
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// Non-2xx response carrying a `detail` message
    #[error("server error {status}: {detail}")]
    Server { status: u16, detail: String },

    /// 404 carrying a `detail` message
    #[error("not found: {detail}")]
    NotFound { detail: String },

    /// Response decoded but violated a domain invariant
    #[error("invalid data from server: {0}")]
    Invalid(#[from] DomainError),
}

impl ApiError {
    /// Classify a non-2xx response from its status and raw body.
    ///
    /// A JSON body of the form `{"detail": "<text>"}` yields `Server` (or
    /// `NotFound` for 404). Anything else, including FastAPI's list-shaped
    /// validation details, yields `Status`.
    pub fn from_response(status: u16, body: String) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .filter(|d| !d.trim().is_empty());

        match detail {
            Some(detail) if status == 404 => ApiError::NotFound { detail },
            Some(detail) => ApiError::Server { status, detail },
            None => ApiError::Status { status, body },
        }
    }

    /// The server-provided detail message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Server { detail, .. } | ApiError::NotFound { detail } => {
                Some(detail.as_str())
            }
            _ => None,
        }
    }
}
