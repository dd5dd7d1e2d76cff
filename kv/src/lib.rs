//! KvStore - async string key-value storage
//!
//! A small storage facility for applications that persist a handful of
//! serialized documents under well-known keys. Values are opaque strings;
//! callers decide the encoding.
//!
//! # Backends
//!
//! ```text
//! memory  - in-process map, lost on exit
//! file    - {path}/{key}, one file per key, atomic replace on write
//! sqlite  - {path} database, single `kv` table
//! ```
//!
//! # Example
//!
//! ```ignore
//! use kvstore::{Backend, FileBackend};
//!
//! let store = FileBackend::open(".kvstore")?;
//! store.set("greeting", "\"hello\"").await?;
//! assert_eq!(store.get("greeting").await?.as_deref(), Some("\"hello\""));
//! ```

pub mod backend;
pub mod cli;
pub mod config;
mod error;
mod file;
mod memory;
mod sqlite;

pub use backend::{Backend, validate_key};
pub use config::{BackendKind, StoreConfig, open_backend};
pub use error::BackendError;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
