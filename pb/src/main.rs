//! Productivity assistant core
//!
//! CLI entry point for asking the assistant and managing persisted state.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use productivity::cli::{Cli, Command};
use productivity::config::Config;
use productivity::llm::{Chat, ChatBridge};
use productivity::state::StateStore;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("productivity")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("productivity.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).context(format!("{} is not valid JSON", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Ask { prompt } => cmd_ask(&config, &prompt.join(" ")).await,
        Command::Load => cmd_load(&config).await,
        Command::Save { tasks, stats } => cmd_save(&config, &tasks, &stats).await,
        Command::Config => {
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
    }
}

async fn cmd_ask(config: &Config, prompt: &str) -> Result<()> {
    config.validate()?;
    let bridge = ChatBridge::from_config(&config.llm).context("Failed to create chat client")?;

    match bridge.send(prompt).await {
        Some(reply) => {
            println!("{}", reply);
            Ok(())
        }
        None => {
            eprintln!("{} No reply from the assistant (see log for details)", "✗".red());
            std::process::exit(1);
        }
    }
}

fn open_store(config: &Config) -> Result<StateStore<Value, Value>> {
    let backend = kvstore::open_backend(&config.storage).context("Failed to open storage backend")?;
    Ok(StateStore::new(backend))
}

async fn cmd_load(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let snapshot = store.load().await;

    if snapshot.is_empty() {
        eprintln!("{}", "No saved state (first run)".dimmed());
    }
    println!("{}", "tasks:".cyan());
    println!("{}", serde_json::to_string_pretty(&snapshot.tasks)?);
    println!("{}", "stats:".cyan());
    println!("{}", serde_json::to_string_pretty(&snapshot.stats)?);
    Ok(())
}

async fn cmd_save(config: &Config, tasks_path: &Path, stats_path: &Path) -> Result<()> {
    let tasks = read_document(tasks_path)?;
    let stats = read_document(stats_path)?;

    let store = open_store(config)?;
    store
        .try_save(&tasks, &stats)
        .await
        .context(format!("Failed to save to {} backend", config.storage.kind))?;

    println!("{} Saved tasks and stats", "✓".green());
    Ok(())
}
