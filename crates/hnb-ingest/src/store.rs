//! SQLite-backed persistence
//!
//! One table, `hn`, keyed by item id. Each accepted item is written in
//! its own transaction; a row only becomes visible to a later max-id
//! lookup once its insert has committed, which is what makes the
//! max-id resume cursor safe to trust.

use hnb_common::{HnbError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::item::Item;

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to the item store, cheap to clone across tasks
#[derive(Clone)]
pub struct ItemStore {
    pool: SqlitePool,
}

impl ItemStore {
    /// Open (creating if needed) the database at `path` and ensure the
    /// schema exists.
    ///
    /// WAL mode plus a busy timeout lets the concurrent worker tasks
    /// share the pool; SQLite serializes the actual writes.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create the `hn` table if it is not already present
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS hn (
                id INTEGER PRIMARY KEY,
                type TEXT,
                title TEXT,
                url TEXT,
                score INTEGER,
                by TEXT,
                time INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Highest stored id, or 0 when the table is empty
    pub async fn max_id(&self) -> Result<i64> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM hn")
            .fetch_one(&self.pool)
            .await?;

        Ok(max.unwrap_or(0))
    }

    /// Durably append one record, keyed by its id.
    ///
    /// Fails with [`HnbError::DuplicateRecord`] if the id already
    /// exists. Existing rows are never overwritten; a collision here
    /// means the resume logic went wrong and must surface.
    pub async fn insert(&self, item: &Item) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO hn (id, type, title, url, score, by, time)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id)
        .bind(&item.kind)
        .bind(&item.title)
        .bind(&item.url)
        .bind(item.score)
        .bind(&item.by)
        .bind(item.time)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(HnbError::DuplicateRecord(item.id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hn")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        info!("closing item store");
        self.pool.close().await;
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
