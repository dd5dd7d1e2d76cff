//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Productivity assistant core
#[derive(Parser)]
#[command(
    name = "pb",
    about = "Ask the assistant and manage persisted tasks and stats",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a prompt to the assistant and print the reply
    Ask {
        /// Prompt text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },

    /// Print the saved tasks and stats
    Load,

    /// Save tasks and stats from JSON files
    Save {
        /// JSON file with the task list
        #[arg(short, long)]
        tasks: PathBuf,

        /// JSON file with the statistics
        #[arg(short, long)]
        stats: PathBuf,
    },

    /// Print the effective configuration
    Config,
}
