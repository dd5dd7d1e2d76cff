//! CLI argument parsing for kvstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "kv")]
#[command(author, version, about = "Inspect and edit a key-value store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend kind (overrides config)
    #[arg(short, long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Store path (overrides config)
    #[arg(short, long, global = true)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value stored under a key
    Get {
        #[arg(required = true)]
        key: String,
    },

    /// Store a value under a key
    Set {
        #[arg(required = true)]
        key: String,

        #[arg(required = true)]
        value: String,
    },

    /// Remove a key
    Delete {
        #[arg(required = true)]
        key: String,
    },

    /// List all keys
    List,
}
