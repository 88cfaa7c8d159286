//! Bulk create/read/update/delete against the reviews table
//!
//! Mutating phases run through the batch engine: the input is split into
//! batches, each batch is handled by one pool worker, and every record is
//! retried on its own.

use super::batch::{BatchScheduler, RetryPolicy, ScheduleReport, SchedulerConfig, split};
use super::models::{Review, ReviewKey};
use super::source::load_records;
use super::timing::elapsed_ms;
use crate::config::Config;
use crate::storage::{Consistency, SharedStore, Statement};
use crate::utils::error::{BenchError, Result};
use crate::utils::progress::progress_bar;
use std::path::Path;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::info;

/// Summary of one bulk phase
#[derive(Debug, Clone, PartialEq)]
pub struct BulkReport {
    /// Phase name
    pub operation: String,
    /// Rows affected as the phase reports them
    ///
    /// For inserts this is the growth of the table; for update and delete
    /// it is the number of rows read before the phase.
    pub rows: usize,
    /// Records the engine attempted
    pub attempted: usize,
    /// Records that succeeded within their retry budget
    pub succeeded: usize,
    /// Records that failed every attempt
    pub failed: usize,
    /// Batches dispatched
    pub batches: usize,
    /// Wall-clock duration in milliseconds
    pub duration_ms: f64,
    /// Keys of successfully inserted rows (insert only)
    pub inserted_ids: Vec<ReviewKey>,
}

impl BulkReport {
    fn from_schedule(operation: &str, rows: usize, schedule: &ScheduleReport, duration_ms: f64) -> Self {
        Self {
            operation: operation.to_string(),
            rows,
            attempted: schedule.attempted(),
            succeeded: schedule.succeeded(),
            failed: schedule.failed(),
            batches: schedule.batch_count(),
            duration_ms,
            inserted_ids: Vec::new(),
        }
    }
}

/// Bulk CRUD runner bound to one store session
#[derive(Clone)]
pub struct BulkOperations {
    client: SharedStore,
    consistency: Consistency,
    batch_size: usize,
    retry: RetryPolicy,
    scheduler: BatchScheduler,
    show_progress: bool,
}

impl BulkOperations {
    pub fn new(
        client: SharedStore,
        consistency: Consistency,
        batch_size: usize,
        retry: RetryPolicy,
        scheduler: SchedulerConfig,
    ) -> Self {
        let show_progress = scheduler.show_progress;
        Self {
            client,
            consistency,
            batch_size,
            retry,
            scheduler: BatchScheduler::new(scheduler),
            show_progress,
        }
    }

    /// Build from the run configuration
    pub fn from_config(client: SharedStore, config: &Config) -> Self {
        Self::new(
            client,
            config.store.consistency,
            config.bench.batch_size,
            config.bench.retry_policy(),
            config.bench.scheduler_config(),
        )
    }

    /// Number of rows currently in the table, by full scan
    pub async fn count_rows(&self) -> Result<usize> {
        let rows = self
            .client
            .execute(&Statement::SelectAllReviews, self.consistency)
            .await?
            .into_rows();
        Ok(rows.len())
    }

    /// Load a dataset file and insert every record under a fresh review id
    ///
    /// A malformed line fails before any store call is made.
    pub async fn bulk_insert<P: AsRef<Path>>(&self, path: P) -> Result<BulkReport> {
        let records = load_records(path).await?;
        let reviews: Vec<Review> = records.into_iter().map(Review::with_generated_id).collect();
        self.bulk_insert_reviews(reviews).await
    }

    /// Insert already-keyed rows
    pub async fn bulk_insert_reviews(&self, reviews: Vec<Review>) -> Result<BulkReport> {
        let before = self.count_rows().await?;
        info!("Records before insert: {}", before);

        let start = Instant::now();
        let schedule = self
            .run_mutations("Inserting", reviews, Statement::InsertReview)
            .await?;
        let after = self.count_rows().await?;
        let duration = elapsed_ms(start);

        let inserted = after.saturating_sub(before);
        info!("Records after insert: {}", after);
        info!("Inserted {} new records in {} ms", inserted, duration);

        let mut report = BulkReport::from_schedule("Bulk Insert", inserted, &schedule, duration);
        report.inserted_ids = schedule.succeeded_keys();
        Ok(report)
    }

    /// Read every row of the table
    pub async fn read_all(&self) -> Result<(Vec<Review>, f64)> {
        let start = Instant::now();
        let rows = self
            .client
            .execute(&Statement::SelectAllReviews, self.consistency)
            .await?
            .into_rows();

        let bar = progress_bar(rows.len(), "📖 Reading", self.show_progress);
        bar.inc(rows.len() as u64);
        bar.finish();

        let duration = elapsed_ms(start);
        info!("Read {} records in {} ms", rows.len(), duration);
        Ok((rows, duration))
    }

    /// Add `boost` to the rating of every row
    pub async fn update_all_ratings(&self, boost: f32) -> Result<BulkReport> {
        let (rows, _) = self.read_all().await?;
        let count = rows.len();

        let start = Instant::now();
        let schedule = self
            .run_mutations("Updating", rows, move |row: Review| Statement::UpdateRating {
                rating: row.rating + boost,
                key: row.key(),
            })
            .await?;
        let duration = elapsed_ms(start);

        info!("Updated rating for {} records in {} ms", count, duration);
        Ok(BulkReport::from_schedule("Bulk Update", count, &schedule, duration))
    }

    /// Delete every row
    pub async fn delete_all(&self) -> Result<BulkReport> {
        let (rows, _) = self.read_all().await?;
        let count = rows.len();

        let start = Instant::now();
        let schedule = self
            .run_mutations("Deleting", rows, |row: Review| Statement::DeleteReview {
                key: row.key(),
            })
            .await?;
        let duration = elapsed_ms(start);

        info!("Deleted {} records in {} ms", count, duration);
        Ok(BulkReport::from_schedule("Bulk Delete", count, &schedule, duration))
    }

    /// Batch `items`, turn each into a row-level statement and run them
    async fn run_mutations<T, M>(
        &self,
        label: &str,
        items: Vec<T>,
        to_statement: M,
    ) -> Result<ScheduleReport>
    where
        T: Send + 'static,
        M: Fn(T) -> Statement + Send + Sync + 'static,
    {
        let batches = split(items, self.batch_size);
        let client = Arc::clone(&self.client);
        let retry = self.retry;
        let consistency = self.consistency;
        let to_statement = Arc::new(to_statement);

        self.scheduler
            .run(label, batches, move |batch| {
                let client = Arc::clone(&client);
                let to_statement = Arc::clone(&to_statement);
                async move {
                    let mut results = Vec::with_capacity(batch.len());
                    for item in batch.items {
                        let statement = (*to_statement)(item);
                        let key = statement.target_key().ok_or_else(|| {
                            BenchError::worker(format!(
                                "statement has no target row: {}",
                                statement.cql()
                            ))
                        })?;
                        let result = retry
                            .execute_record(key, || client.execute(&statement, consistency))
                            .await;
                        results.push(result);
                    }
                    Ok::<_, BenchError>(results)
                }
            })
            .await
    }
}

impl std::fmt::Debug for BulkOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkOperations")
            .field("consistency", &self.consistency)
            .field("batch_size", &self.batch_size)
            .field("retry", &self.retry)
            .field("scheduler", self.scheduler.config())
            .finish()
    }
}

