use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use kvstore::cli::{Cli, Command};
use kvstore::{Backend, StoreConfig, open_backend};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let mut config = StoreConfig::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(kind) = cli.backend {
        config.kind = kind;
    }
    if let Some(path) = cli.path {
        config.path = path;
    }

    info!("kv starting ({} at {})", config.kind, config.path.display());
    let store = open_backend(&config).context("Failed to open store")?;

    match cli.command {
        Command::Get { key } => match store.get(&key).await? {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("{} Key not found: {}", "✗".red(), key.yellow());
                std::process::exit(1);
            }
        },
        Command::Set { key, value } => {
            store.set(&key, &value).await?;
            println!("{} Stored {}", "✓".green(), key.cyan());
        }
        Command::Delete { key } => {
            if store.delete(&key).await? {
                println!("{} Deleted {}", "✓".green(), key.cyan());
            } else {
                println!("Key not found: {}", key.yellow());
            }
        }
        Command::List => {
            let keys = store.keys().await?;
            if keys.is_empty() {
                println!("No keys found");
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
    }

    Ok(())
}
