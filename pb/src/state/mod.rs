//! Persisted application state
//!
//! StateStore saves the task list and usage statistics as JSON text under two
//! fixed keys of an injected [`kvstore::Backend`], and recovers them at startup.

mod error;
mod store;

pub use error::{LoadError, SaveError};
pub use store::{STATS_KEY, Snapshot, StateStore, TASKS_KEY};
