//! Bounded dispatcher
//!
//! Walks the id range in ascending order, fanning each id out to a
//! fixed-size worker pool that runs fetch → filter → insert. The pool
//! is a `JoinSet` whose task bodies gate on a semaphore: at most
//! `concurrency` pipelines make progress at once, and submission
//! stalls once the outstanding backlog reaches twice that, which
//! bounds memory and open sockets no matter how fast ids are
//! generated relative to completion.
//!
//! A task-level error (retries exhausted, duplicate key, panic) is
//! fatal: no further ids are submitted, in-flight tasks are allowed to
//! finish, and the run returns the error so the process exits
//! non-zero. The run only reports completion after the pool has fully
//! drained.

use hnb_common::{HnbError, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::client::HnClient;
use crate::config::IngestConfig;
use crate::filter;
use crate::progress::ProgressReporter;
use crate::store::ItemStore;

/// Outstanding-task ceiling, as a multiple of the pool size
const BACKPRESSURE_FACTOR: usize = 2;

/// How long the submission loop sleeps while the backlog is full
const BACKPRESSURE_POLL: Duration = Duration::from_millis(500);

/// What became of one dispatched id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskOutcome {
    /// Fetched, qualified, and durably written
    Inserted,
    /// Fetched but did not pass the filter
    Filtered,
    /// The API has no item for this id (null body)
    Absent,
}

/// Aggregated result of a completed run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// First id dispatched (the resume cursor's answer)
    pub start_id: i64,
    /// Ids submitted to the pool
    pub dispatched: u64,
    /// Records written to the store
    pub inserted: u64,
    /// Items rejected by the filter
    pub filtered: u64,
    /// Ids with no item behind them
    pub absent: u64,
    /// Largest queued-plus-in-flight task count observed; never more
    /// than twice the configured concurrency
    pub max_backlog: usize,
    /// Wall-clock duration of the run in seconds
    pub elapsed_secs: f64,
}

/// Orchestrates one resumable ingestion run
pub struct Dispatcher {
    config: IngestConfig,
    client: Arc<HnClient>,
    store: ItemStore,
    reporter: Arc<ProgressReporter>,
}

impl Dispatcher {
    pub fn new(config: IngestConfig, client: HnClient, store: ItemStore) -> Self {
        Self {
            config,
            client: Arc::new(client),
            store,
            reporter: Arc::new(ProgressReporter::new()),
        }
    }

    /// Run the pipeline from the resume cursor up to the configured
    /// exclusive upper bound.
    pub async fn run(&self) -> Result<RunStats> {
        let started = Instant::now();

        // The cursor is computed exactly once, before any worker can
        // append. During the run the loop variable below is the only
        // source of truth for the next id.
        let start_id = self.store.max_id().await? + 1;

        info!(
            start_id,
            max_id = self.config.max_id,
            concurrency = self.config.concurrency,
            "starting ingestion run"
        );

        let mut stats = RunStats {
            start_id,
            ..RunStats::default()
        };

        let backlog_limit = self.config.concurrency * BACKPRESSURE_FACTOR;
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks: JoinSet<Result<TaskOutcome>> = JoinSet::new();
        let mut fatal: Option<HnbError> = None;

        let mut next_id = start_id;
        'submit: while next_id < self.config.max_id {
            // Reap whatever has finished without blocking.
            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = record_outcome(joined, &mut stats) {
                    fatal = Some(e);
                    break 'submit;
                }
            }

            // Backpressure gate: hold submission while the backlog of
            // queued plus in-flight tasks is at the ceiling.
            while tasks.len() >= backlog_limit {
                tokio::time::sleep(BACKPRESSURE_POLL).await;
                while let Some(joined) = tasks.try_join_next() {
                    if let Err(e) = record_outcome(joined, &mut stats) {
                        fatal = Some(e);
                        break 'submit;
                    }
                }
            }

            let client = Arc::clone(&self.client);
            let store = self.store.clone();
            let reporter = Arc::clone(&self.reporter);
            let semaphore = Arc::clone(&semaphore);
            let id = next_id;
            tasks.spawn(async move { process_id(client, store, reporter, semaphore, id).await });

            next_id += 1;
            stats.dispatched += 1;
            stats.max_backlog = stats.max_backlog.max(tasks.len());
        }

        if fatal.is_some() {
            info!(
                remaining = tasks.len(),
                "fatal task error, stopping submission and draining in-flight tasks"
            );
        }

        // Drain completely before declaring the run over; the last
        // batch of tasks must not be lost to process exit.
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = record_outcome(joined, &mut stats) {
                if fatal.is_none() {
                    fatal = Some(e);
                }
            }
        }

        stats.elapsed_secs = started.elapsed().as_secs_f64();

        if let Some(e) = fatal {
            error!(
                error = %e,
                dispatched = stats.dispatched,
                inserted = stats.inserted,
                "ingestion run aborted"
            );
            return Err(e);
        }

        info!(
            start_id = stats.start_id,
            dispatched = stats.dispatched,
            inserted = stats.inserted,
            filtered = stats.filtered,
            absent = stats.absent,
            elapsed_secs = format!("{:.1}", stats.elapsed_secs),
            "ingestion run complete"
        );

        Ok(stats)
    }
}

/// One id's fetch → filter → write pipeline.
///
/// The semaphore permit is what actually bounds concurrent execution;
/// tasks beyond the pool size queue here in FIFO order.
async fn process_id(
    client: Arc<HnClient>,
    store: ItemStore,
    reporter: Arc<ProgressReporter>,
    semaphore: Arc<Semaphore>,
    id: i64,
) -> Result<TaskOutcome> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|_| HnbError::TaskFailed(format!("worker pool closed before id {id}")))?;

    let item = client.fetch_item(id).await?;

    // Sampled by id value, whatever the item turned out to be.
    if ProgressReporter::is_sample_id(id) {
        reporter.observe(id, item.as_ref().and_then(|i| i.time));
    }

    let Some(item) = item else {
        debug!(id, "no item behind id");
        return Ok(TaskOutcome::Absent);
    };

    if !filter::qualifies(&item) {
        return Ok(TaskOutcome::Filtered);
    }

    store.insert(&item).await?;
    Ok(TaskOutcome::Inserted)
}

/// Fold one joined task into the stats, surfacing task errors and
/// panics as fatal.
fn record_outcome(
    joined: std::result::Result<Result<TaskOutcome>, tokio::task::JoinError>,
    stats: &mut RunStats,
) -> Result<()> {
    match joined {
        Ok(Ok(TaskOutcome::Inserted)) => stats.inserted += 1,
        Ok(Ok(TaskOutcome::Filtered)) => stats.filtered += 1,
        Ok(Ok(TaskOutcome::Absent)) => stats.absent += 1,
        Ok(Err(e)) => return Err(e),
        Err(join_err) => return Err(HnbError::TaskFailed(join_err.to_string())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcome_counts() {
        let mut stats = RunStats::default();
        record_outcome(Ok(Ok(TaskOutcome::Inserted)), &mut stats).unwrap();
        record_outcome(Ok(Ok(TaskOutcome::Inserted)), &mut stats).unwrap();
        record_outcome(Ok(Ok(TaskOutcome::Filtered)), &mut stats).unwrap();
        record_outcome(Ok(Ok(TaskOutcome::Absent)), &mut stats).unwrap();

        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.filtered, 1);
        assert_eq!(stats.absent, 1);
    }

    #[test]
    fn test_record_outcome_propagates_task_error() {
        let mut stats = RunStats::default();
        let err = record_outcome(Ok(Err(HnbError::DuplicateRecord(9))), &mut stats).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(stats.inserted, 0);
    }
}
