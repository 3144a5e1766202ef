//! Cashbook main entry point

use cashbook_api::start_server;
use cashbook_config::{Config, ConfigError, ConfigResult};
use cashbook_core::Books;
use cashbook_store::{FileStore, MemoryStore, StoreRef};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "cashbook")]
#[command(author = "Cashbook Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Cash-basis double-entry bookkeeping with financial statements", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

/// Load the config file; a missing file means defaults
fn load_config(path: &PathBuf) -> ConfigResult<(Config, bool)> {
    match Config::load(path) {
        Ok(config) => Ok((config, true)),
        Err(ConfigError::FileNotFound { .. }) => Ok((Config::default(), false)),
        Err(e) => Err(e),
    }
}

fn init_logging(level: &str) {
    env_logger::Builder::new()
        .parse_filters(level)
        .parse_env("RUST_LOG")
        .init();
}

async fn open_store(config: &Config) -> Result<StoreRef, Box<dyn std::error::Error>> {
    match &config.data.path {
        Some(path) => {
            let store = FileStore::open(path).await?;
            log::info!("Ledger snapshot: {}", path.display());
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("data.path is not set, the ledger is kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (config, from_file) = load_config(&args.config)?;
    init_logging(&config.logging.level);

    if from_file {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::info!("Config file {} not found, using defaults", args.config.display());
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        let store = open_store(&config).await?;
        let books = Arc::new(Books::new(&config, store));
        start_server(config, books).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
