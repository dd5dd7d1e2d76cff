//! Backend trait definition

use std::sync::Arc;

use async_trait::async_trait;

use crate::BackendError;

/// Asynchronous string key-value store
///
/// Implementations keep the last value written for each key. There is no
/// compare-and-swap: concurrent writers to the same key race and the last
/// write wins.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key was never set
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Remove `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool, BackendError>;

    /// List all keys in ascending order
    async fn keys(&self) -> Result<Vec<String>, BackendError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        (**self).delete(key).await
    }

    async fn keys(&self) -> Result<Vec<String>, BackendError> {
        (**self).keys().await
    }
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Box<B> {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        (**self).delete(key).await
    }

    async fn keys(&self) -> Result<Vec<String>, BackendError> {
        (**self).keys().await
    }
}

/// Reject keys that cannot be stored safely by every backend
///
/// The file backend maps keys directly to file names, so keys must be
/// non-empty, free of path separators and NUL, and must not start with a dot
/// (reserved for lock and temporary files).
pub fn validate_key(key: &str) -> Result<(), BackendError> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if key.contains('\0') {
        Some("contains a NUL byte")
    } else if key.starts_with('.') {
        Some("starts with a dot")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(BackendError::InvalidKey {
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
