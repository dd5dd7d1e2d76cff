//! Chat error types

use thiserror::Error;

/// Errors that can occur during a chat request
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ChatError {
    /// The request did not produce a usable HTTP exchange
    ///
    /// Network failures and non-success statuses both count: the service was
    /// unreachable or refused the request.
    pub fn is_transport(&self) -> bool {
        matches!(self, ChatError::Network(_) | ChatError::ApiError { .. })
    }

    /// The exchange succeeded but the payload could not be used
    pub fn is_malformed(&self) -> bool {
        matches!(self, ChatError::Json(_) | ChatError::MalformedResponse(_))
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::ApiError { status, .. } => Some(*status),
            ChatError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
