//! State store errors

use kvstore::BackendError;
use thiserror::Error;

/// Why `try_load` could not produce a snapshot
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read '{key}': {source}")]
    Backend {
        key: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("Stored value under '{key}' is not a valid document: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Key whose read or decode failed
    pub fn key(&self) -> &'static str {
        match self {
            LoadError::Backend { key, .. } | LoadError::Decode { key, .. } => key,
        }
    }

    /// The stored data is corrupt, as opposed to the backend being unreachable
    ///
    /// Bytes the backend could not turn into a string count as corrupt too.
    pub fn is_corrupt(&self) -> bool {
        match self {
            LoadError::Decode { .. } => true,
            LoadError::Backend { source, .. } => source.is_invalid_data(),
        }
    }
}

/// Why `try_save` did not complete
///
/// Writes are sequential (tasks, then stats) and not rolled back: a
/// `Backend` error on the stats key means the tasks write already landed.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to encode document for '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write '{key}': {source}")]
    Backend {
        key: &'static str,
        #[source]
        source: BackendError,
    },
}

impl SaveError {
    /// Key whose encode or write failed
    pub fn key(&self) -> &'static str {
        match self {
            SaveError::Encode { key, .. } | SaveError::Backend { key, .. } => key,
        }
    }
}
