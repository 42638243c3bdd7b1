//! HNB Ingest Library
//!
//! Resumable, bounded-concurrency backfill of Hacker News items into
//! a local SQLite store.
//!
//! A run computes its starting id from the highest id already stored,
//! then drives sequential ids through fetch → filter → durable write
//! across a fixed-size worker pool, and terminates at a configured
//! upper bound. Restarting after a crash or a completed run picks up
//! where the store left off without rewriting existing rows.
//!
//! # Example
//!
//! ```no_run
//! use hnb_ingest::{client::HnClient, config::IngestConfig, dispatcher::Dispatcher, store::ItemStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::new(43_847_069);
//!     let client = HnClient::new(config.api_base_url.clone())?;
//!     let store = ItemStore::open(&config.db_path).await?;
//!     Dispatcher::new(config, client, store).run().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod filter;
pub mod item;
pub mod progress;
pub mod store;
