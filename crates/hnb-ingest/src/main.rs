//! HNB Ingest - Hacker News backfill tool

use anyhow::{Context, Result};
use clap::Parser;
use hnb_common::logging::{init_logging, LogConfig, LogLevel};
use hnb_ingest::client::HnClient;
use hnb_ingest::config::{IngestConfig, DEFAULT_API_BASE_URL, DEFAULT_DB_PATH};
use hnb_ingest::dispatcher::Dispatcher;
use hnb_ingest::store::ItemStore;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hnb-ingest")]
#[command(author, version, about = "Backfill Hacker News items into a local SQLite store")]
struct Cli {
    /// Exclusive upper bound of the id range to process
    #[arg(long, env = "MAX_ID")]
    max_id: i64,

    /// Worker pool size
    #[arg(long, env = "CONCURRENCY", default_value_t = 100)]
    concurrency: usize,

    /// Path to the SQLite database file
    #[arg(long, env = "HN_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// Base URL of the item API
    #[arg(long, env = "HN_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a .env file if one is present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    log_config.log_file_prefix = "hnb-ingest".to_string();
    init_logging(&log_config)?;

    let config = IngestConfig {
        api_base_url: cli.api_base_url,
        db_path: cli.db_path,
        concurrency: cli.concurrency,
        max_id: cli.max_id,
    };
    config.validate()?;

    let client =
        HnClient::new(config.api_base_url.clone()).context("Failed to build API client")?;
    let store = ItemStore::open(&config.db_path)
        .await
        .context("Failed to open item store")?;

    let result = Dispatcher::new(config, client, store.clone()).run().await;

    // Close the store whichever way the run ended.
    store.close().await;

    let stats = result.context("Ingestion run failed")?;
    info!(inserted = stats.inserted, "done");

    Ok(())
}
