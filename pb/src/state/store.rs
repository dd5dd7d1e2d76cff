//! StateStore - tasks and stats documents over a key-value backend

use std::marker::PhantomData;
use std::sync::Arc;

use kvstore::Backend;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use super::{LoadError, SaveError};

/// Backend key holding the JSON-encoded task list
pub const TASKS_KEY: &str = "productivity-tasks";

/// Backend key holding the JSON-encoded usage statistics
pub const STATS_KEY: &str = "productivity-stats";

/// Documents recovered by a load; `None` where nothing was saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T, S> {
    pub tasks: Option<T>,
    pub stats: Option<S>,
}

impl<T, S> Default for Snapshot<T, S> {
    fn default() -> Self {
        Self { tasks: None, stats: None }
    }
}

impl<T, S> Snapshot<T, S> {
    /// Neither document is present (first run)
    pub fn is_empty(&self) -> bool {
        self.tasks.is_none() && self.stats.is_none()
    }
}

/// Persists a task document `T` and a stats document `S`
///
/// The document types are fixed per store, so a store only ever decodes the
/// types it encodes. The two documents live under separate keys and are
/// written one after the other; there is no atomicity across the pair.
pub struct StateStore<T, S> {
    backend: Arc<dyn Backend>,
    _documents: PhantomData<fn() -> (T, S)>,
}

impl<T, S> Clone for StateStore<T, S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _documents: PhantomData,
        }
    }
}

impl<T, S> StateStore<T, S>
where
    T: Serialize + DeserializeOwned,
    S: Serialize + DeserializeOwned,
{
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            _documents: PhantomData,
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Read both documents, reporting the first failure
    ///
    /// Absent keys are not failures; they come back as `None`.
    pub async fn try_load(&self) -> Result<Snapshot<T, S>, LoadError> {
        debug!("try_load: called");
        let tasks = self.read(TASKS_KEY).await?;
        let stats = self.read(STATS_KEY).await?;
        debug!(has_tasks = tasks.is_some(), has_stats = stats.is_some(), "try_load: done");
        Ok(Snapshot { tasks, stats })
    }

    /// Best-effort load
    ///
    /// Any failure, including a corrupt value under just one key, is treated
    /// as a first run: both documents come back `None`.
    pub async fn load(&self) -> Snapshot<T, S> {
        match self.try_load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                info!(error = %e, key = e.key(), "No usable saved state, starting fresh");
                Snapshot::default()
            }
        }
    }

    /// Encode both documents, then write tasks followed by stats
    ///
    /// Nothing is written if either document fails to encode. A failed stats
    /// write leaves the new tasks in place.
    pub async fn try_save(&self, tasks: &T, stats: &S) -> Result<(), SaveError> {
        debug!("try_save: called");
        let tasks_json = encode(TASKS_KEY, tasks)?;
        let stats_json = encode(STATS_KEY, stats)?;

        self.write(TASKS_KEY, &tasks_json).await?;
        self.write(STATS_KEY, &stats_json).await?;
        debug!(tasks_len = tasks_json.len(), stats_len = stats_json.len(), "try_save: done");
        Ok(())
    }

    /// Best-effort save; failures are logged and otherwise ignored
    pub async fn save(&self, tasks: &T, stats: &S) {
        if let Err(e) = self.try_save(tasks, stats).await {
            error!(error = %e, key = e.key(), "Failed to save state");
        }
    }

    async fn read<D: DeserializeOwned>(&self, key: &'static str) -> Result<Option<D>, LoadError> {
        let raw = self
            .backend
            .get(key)
            .await
            .map_err(|source| LoadError::Backend { key, source })?;

        raw.map(|text| serde_json::from_str(&text).map_err(|source| LoadError::Decode { key, source }))
            .transpose()
    }

    async fn write(&self, key: &'static str, value: &str) -> Result<(), SaveError> {
        self.backend
            .set(key, value)
            .await
            .map_err(|source| SaveError::Backend { key, source })
    }
}

fn encode<D: Serialize>(key: &'static str, document: &D) -> Result<String, SaveError> {
    serde_json::to_string(document).map_err(|source| SaveError::Encode { key, source })
}
