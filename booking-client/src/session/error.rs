//! User-facing error taxonomy.

use crate::api::ApiError;
use crate::reference::DuplicateName;

/// How a workflow operation failed, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Precondition failed on the client; no request was sent
    #[error("{0}")]
    Validation(String),

    /// Transport failure, timeout, undecodable body or non-2xx without detail
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx carrying a detail message
    #[error("{0}")]
    Server(String),

    /// The referenced booking or provider does not exist
    #[error("{0}")]
    NotFound(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Server-provided detail, suitable for showing verbatim.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Server(detail) | ClientError::NotFound(detail) => Some(detail),
            ClientError::Validation(_) | ClientError::Network(_) => None,
        }
    }

    /// Detail if the server sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Server { detail, .. } => ClientError::Server(detail),
            ApiError::NotFound { detail } => ClientError::NotFound(detail),
            ApiError::Invalid(e) => ClientError::Server(format!("invalid data from server: {e}")),
            ApiError::Http(_) | ApiError::Timeout | ApiError::Json { .. } | ApiError::Status { .. } => {
                ClientError::Network(err.to_string())
            }
        }
    }
}

impl From<DuplicateName> for ClientError {
    fn from(err: DuplicateName) -> Self {
        ClientError::Server(err.to_string())
    }
}
