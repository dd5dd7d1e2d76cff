//! File-per-key backend
//!
//! Layout:
//!
//! ```text
//! {path}/
//! ├── .lock                 # writer lock (fs2)
//! ├── productivity-tasks    # value of key "productivity-tasks"
//! └── productivity-stats
//! ```
//!
//! Writes land in a hidden temporary file and are renamed over the target, so
//! a key is either absent or holds a complete value.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{Backend, BackendError, validate_key};

const LOCK_FILE: &str = ".lock";

/// Backend storing each key as a file inside one directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open or create a file backend rooted at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let dir = path.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "Opened file backend");
        Ok(Self { dir })
    }

    /// Directory holding the stored files
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, BackendError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

fn lock_dir(dir: &Path) -> Result<File, BackendError> {
    let lock = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(dir.join(LOCK_FILE))?;
    FileExt::lock_exclusive(&lock)?;
    Ok(lock)
}

fn write_atomic(dir: &Path, target: &Path, value: &str) -> Result<(), BackendError> {
    // Held until dropped at the end of this function
    let _lock = lock_dir(dir)?;

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::now_v7()));

    if let Err(e) = write_then_rename(&tmp, target, value) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn write_then_rename(tmp: &Path, target: &Path, value: &str) -> std::io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    fs::rename(tmp, target)
}

#[async_trait]
impl Backend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        debug!(%key, "FileBackend::get: called");
        let path = self.key_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let value = String::from_utf8(bytes).map_err(|source| BackendError::InvalidData {
                    key: key.to_string(),
                    source,
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(%key, "FileBackend::get: not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        debug!(%key, value_len = value.len(), "FileBackend::set: called");
        let target = self.key_path(key)?;
        let dir = self.dir.clone();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &value)).await?
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        debug!(%key, "FileBackend::delete: called");
        let target = self.key_path(key)?;
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || -> Result<bool, BackendError> {
            let _lock = lock_dir(&dir)?;
            match fs::remove_file(&target) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
        .await?
    }

    async fn keys(&self) -> Result<Vec<String>, BackendError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') {
                keys.push(name);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
