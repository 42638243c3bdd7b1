//! Progress reporting
//!
//! Emits one log line for every 10,000th id dispatched (by id value,
//! not completion count). Purely observational; nothing here feeds
//! back into the pipeline, and a bad timestamp never fails a task.

use chrono::DateTime;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{info, warn};

/// Ids between samples
pub const SAMPLE_INTERVAL: i64 = 10_000;

/// Throughput reporter with its own sample clock.
///
/// The previous-sample instant lives here rather than in ambient
/// scope, so the reporter can be created per run and shared across
/// worker tasks.
pub struct ProgressReporter {
    last_sample: Mutex<Instant>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            last_sample: Mutex::new(Instant::now()),
        }
    }

    /// True for ids that should produce a sample
    pub fn is_sample_id(id: i64) -> bool {
        id % SAMPLE_INTERVAL == 0
    }

    /// Record a sample for `id`, logging the item's own timestamp and
    /// the seconds elapsed since the previous sample.
    pub fn observe(&self, id: i64, item_time: Option<i64>) {
        let elapsed = {
            let mut last = match self.last_sample.lock() {
                Ok(guard) => guard,
                // A poisoned clock only degrades the elapsed figure.
                Err(poisoned) => poisoned.into_inner(),
            };
            let elapsed = last.elapsed();
            *last = Instant::now();
            elapsed
        };

        info!(
            id,
            item_time = %format_item_time(item_time),
            elapsed_secs = format!("{:.3}", elapsed.as_secs_f64()),
            "progress"
        );
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format an epoch-seconds timestamp as RFC 3339, degrading to an
/// empty string when the value is missing or out of range.
fn format_item_time(time: Option<i64>) -> String {
    let Some(secs) = time else {
        return String::new();
    };
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.to_rfc3339(),
        None => {
            warn!(time = secs, "item timestamp out of range");
            String::new()
        }
    }
}
