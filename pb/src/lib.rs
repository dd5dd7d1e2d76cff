//! Productivity - assistant core
//!
//! Two independent components used by a productivity assistant:
//!
//! - **ChatBridge**: sends one prompt to the Anthropic Messages API and
//!   returns the text of the first content block
//! - **StateStore**: saves and loads the task list and usage statistics as
//!   JSON documents in a [`kvstore::Backend`]
//!
//! Both offer a typed API (`try_*`) that reports what went wrong, and a
//! best-effort API that logs failures and returns `None` or an empty snapshot.
//!
//! # Modules
//!
//! - [`llm`] - ChatBridge and its request/response types
//! - [`state`] - StateStore over an injected backend
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod state;

pub use config::{Config, LlmConfig};
pub use llm::{Chat, ChatBridge, ChatError};
pub use state::{LoadError, STATS_KEY, SaveError, Snapshot, StateStore, TASKS_KEY};
