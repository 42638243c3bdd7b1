//! Ingestion run configuration

use hnb_common::{HnbError, Result};
use std::path::PathBuf;

/// Default worker pool size
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://hacker-news.firebaseio.com";

/// Default database path
pub const DEFAULT_DB_PATH: &str = "hn.db";

/// Configuration for one ingestion run
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Base URL of the item API
    pub api_base_url: String,

    /// Path to the SQLite database file
    pub db_path: PathBuf,

    /// Worker pool size (ids processed concurrently)
    pub concurrency: usize,

    /// Exclusive upper bound of the id range
    pub max_id: i64,
}

impl IngestConfig {
    pub fn new(max_id: i64) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            concurrency: DEFAULT_CONCURRENCY,
            max_id,
        }
    }

    /// Reject configurations the dispatcher cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(HnbError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_id < 1 {
            return Err(HnbError::Config(format!(
                "max-id must be positive, got {}",
                self.max_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::new(1000);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.db_path, PathBuf::from("hn.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = IngestConfig::new(1000);
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_max_id_rejected() {
        assert!(IngestConfig::new(0).validate().is_err());
        assert!(IngestConfig::new(-5).validate().is_err());
    }
}
