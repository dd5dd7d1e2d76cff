//! Configuration for kvstore

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Backend, BackendError, FileBackend, MemoryBackend, SqliteBackend};

/// Which backend implementation to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    Sqlite,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::File => "file",
            BackendKind::Sqlite => "sqlite",
            BackendKind::Memory => "memory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend implementation
    #[serde(default)]
    pub kind: BackendKind,

    /// Directory (file) or database file (sqlite); ignored for memory
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("productivity")
        .join("store")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path);
        }

        let default_paths = [
            dirs::config_dir().map(|p| p.join("kvstore").join("config.yml")),
            Some(PathBuf::from("kvstore.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

/// Open the backend described by `config`
pub fn open_backend(config: &StoreConfig) -> Result<Arc<dyn Backend>, BackendError> {
    debug!(kind = %config.kind, path = %config.path.display(), "open_backend: called");
    match config.kind {
        BackendKind::File => Ok(Arc::new(FileBackend::open(&config.path)?)),
        BackendKind::Sqlite => Ok(Arc::new(SqliteBackend::open(&config.path)?)),
        BackendKind::Memory => Ok(Arc::new(MemoryBackend::new())),
    }
}
