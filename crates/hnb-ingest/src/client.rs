//! HTTP client for the Hacker News item API
//!
//! Wraps a shared `reqwest::Client` with the retry policy the rest of
//! the pipeline relies on: transient failures (network errors,
//! timeouts, non-2xx statuses) are absorbed here, so an error from
//! [`HnClient::fetch_item`] means the retry budget is spent.

use hnb_common::{HnbError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::item::Item;

/// Total attempts per item, including the first
pub const MAX_ATTEMPTS: u32 = 5;

/// Fixed delay between attempts
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Default request timeout in seconds.
/// Can be overridden via HN_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Client for `GET {base}/v0/item/{id}.json`
pub struct HnClient {
    client: Client,
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl HnClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: String) -> Result<Self> {
        let timeout_secs = std::env::var("HN_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        })
    }

    /// Override the retry policy (tests use this to avoid real delays)
    pub fn with_retry_policy(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.retry_delay = retry_delay;
        self
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/v0/item/{}.json", self.base_url, id)
    }

    /// Fetch one item by id, retrying transient failures.
    ///
    /// Returns `Ok(None)` when the API answers with a JSON `null`
    /// body (the id has no item). Absent or unexpected fields are not
    /// validated here; the filter and sink deal with them.
    pub async fn fetch_item(&self, id: i64) -> Result<Option<Item>> {
        let url = self.item_url(id);
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            debug!(id, attempt, max_attempts = self.max_attempts, "fetching item");

            match self.try_fetch(&url).await {
                Ok(item) => return Ok(item),
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < self.max_attempts {
                        warn!(
                            id,
                            attempt,
                            max_attempts = self.max_attempts,
                            error = %last_error,
                            "fetch attempt failed, retrying"
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(HnbError::RetriesExhausted {
            id,
            attempts: self.max_attempts,
            reason: last_error,
        })
    }

    /// One attempt: any transport error or non-2xx status is retryable.
    async fn try_fetch(&self, url: &str) -> std::result::Result<Option<Item>, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.json::<Option<Item>>().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_url() {
        let client = HnClient::new("https://hacker-news.firebaseio.com".to_string()).unwrap();
        assert_eq!(
            client.item_url(43847068),
            "https://hacker-news.firebaseio.com/v0/item/43847068.json"
        );
    }
}
