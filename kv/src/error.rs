//! Backend error types

use thiserror::Error;

/// Errors that can occur while reading or writing a backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Stored value under '{key}' is not valid UTF-8: {source}")]
    InvalidData {
        key: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Check if this error was caused by the caller rather than the storage
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, BackendError::InvalidKey { .. })
    }

    /// The backend was reachable but the stored bytes are not a string value
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, BackendError::InvalidData { .. })
    }
}
