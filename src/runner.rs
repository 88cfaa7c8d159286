//! Benchmark run sequencing
//!
//! A run prepares the schema, then executes the single-record suite and
//! the bulk suite in order, pausing between bulk phases so the store can
//! settle.

use crate::config::Config;
use crate::core::bulk::{BulkOperations, BulkReport};
use crate::core::single::{
    delete_single_review, insert_single_review, read_single_review, sample_record,
    update_single_review,
};
use crate::core::timing::TimingReport;
use crate::storage::{self, Consistency, SharedStore, StoreClient};
use crate::utils::error::Result;
use crate::utils::success_rate;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Rating written by the single-record update
pub const SINGLE_UPDATE_RATING: f32 = 4.7;

/// Which parts of the run to execute
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Dataset to insert; falls back to `bench.dataset`
    pub dataset: Option<PathBuf>,
    pub skip_single: bool,
    pub skip_bulk: bool,
}

/// Results of the bulk suite
#[derive(Debug, Clone)]
pub struct BulkSuite {
    pub timings: TimingReport,
    pub insert: BulkReport,
    pub rows_read: usize,
    pub update: BulkReport,
    pub delete: BulkReport,
}

impl BulkSuite {
    /// Mutating phases in execution order
    pub fn phases(&self) -> [&BulkReport; 3] {
        [&self.insert, &self.update, &self.delete]
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub single: Option<TimingReport>,
    pub bulk: Option<BulkSuite>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(single) = &self.single {
            writeln!(f)?;
            write!(f, "{}", single)?;
        }

        if let Some(bulk) = &self.bulk {
            writeln!(f)?;
            write!(f, "{}", bulk.timings)?;
            writeln!(f)?;
            writeln!(f, "📋 Bulk Phase Results:")?;
            for phase in bulk.phases() {
                writeln!(
                    f,
                    "{:<15} : {}/{} succeeded ({}%), {} failed, {} batches",
                    phase.operation,
                    phase.succeeded,
                    phase.attempted,
                    success_rate(phase.succeeded, phase.attempted),
                    phase.failed,
                    phase.batches
                )?;
            }
            writeln!(f, "{:<15} : {} rows", "Bulk Read", bulk.rows_read)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "🕒 Run {} → {} ({} s)",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.finished_at.format("%H:%M:%S"),
            (self.finished_at - self.started_at).num_seconds()
        )
    }
}

/// Insert, read, update and delete the sample record, timing each step
pub async fn run_single_operations(
    client: &dyn StoreClient,
    consistency: Consistency,
) -> Result<TimingReport> {
    info!("🚀 Starting single-record operations...");
    let record = sample_record();
    let asin = record.asin.clone();
    let mut report = TimingReport::new("Single Operation Timings");

    let (review_id, insert_ms) = insert_single_review(client, record, consistency).await?;
    report.record("Insert", insert_ms);

    let (_, read_ms) = read_single_review(client, &asin, &review_id, consistency).await?;
    report.record("Read", read_ms);

    let update_ms =
        update_single_review(client, &asin, &review_id, SINGLE_UPDATE_RATING, consistency).await?;
    report.record("Update", update_ms);

    let delete_ms = delete_single_review(client, &asin, &review_id, consistency).await?;
    report.record("Delete", delete_ms);

    Ok(report)
}

/// Insert the dataset, then read, update and delete every row
pub async fn run_bulk_operations(
    bulk: &BulkOperations,
    dataset: &Path,
    boost: f32,
    pause: Duration,
) -> Result<BulkSuite> {
    info!("🚀 Starting bulk operations on {}", dataset.display());
    let mut timings = TimingReport::new("Bulk Operation Timings");

    let insert = bulk.bulk_insert(dataset).await?;
    timings.record("Bulk Insert", insert.duration_ms);
    settle(pause).await;

    let (rows, read_ms) = bulk.read_all().await?;
    timings.record("Bulk Read", read_ms);
    settle(pause).await;

    let update = bulk.update_all_ratings(boost).await?;
    timings.record("Bulk Update", update.duration_ms);
    settle(pause).await;

    let delete = bulk.delete_all().await?;
    timings.record("Bulk Delete", delete.duration_ms);
    settle(pause).await;

    Ok(BulkSuite {
        timings,
        insert,
        rows_read: rows.len(),
        update,
        delete,
    })
}

async fn settle(pause: Duration) {
    if !pause.is_zero() {
        info!("Waiting {:?} before next phase", pause);
        tokio::time::sleep(pause).await;
    }
}

/// Create the keyspace and table if needed and switch to the keyspace
pub async fn prepare_schema(client: &dyn StoreClient, config: &Config) -> Result<()> {
    storage::create_keyspace_if_not_exists(
        client,
        &config.store.keyspace,
        config.bench.keyspace_poll(),
    )
    .await?;
    storage::create_reviews_table(client).await?;
    Ok(())
}

/// Run against an already opened session
pub async fn run_with_client(
    client: SharedStore,
    config: &Config,
    options: &RunOptions,
) -> Result<RunSummary> {
    let started_at = Utc::now();
    prepare_schema(client.as_ref(), config).await?;

    let single = if options.skip_single {
        None
    } else {
        Some(run_single_operations(client.as_ref(), config.store.consistency).await?)
    };

    let bulk = if options.skip_bulk {
        None
    } else {
        let dataset = options
            .dataset
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.bench.dataset));
        let operations = BulkOperations::from_config(Arc::clone(&client), config);
        Some(
            run_bulk_operations(
                &operations,
                &dataset,
                config.bench.boost,
                config.bench.phase_pause(),
            )
            .await?,
        )
    };

    if config.bench.drop_on_finish {
        storage::drop_reviews_table(client.as_ref()).await?;
        storage::drop_keyspace(client.as_ref(), &config.store.keyspace).await?;
    }

    Ok(RunSummary {
        started_at,
        finished_at: Utc::now(),
        single,
        bulk,
    })
}

/// Open a session from `config`, run, and close the session
pub async fn run(config: &Config, options: &RunOptions) -> Result<RunSummary> {
    let client = storage::connect(&config.store, &config.faults).await?;
    info!("✅ Connected to {}", config.store.endpoint);

    let result = run_with_client(Arc::clone(&client), config, options).await;

    if let Err(e) = client.shutdown().await {
        warn!("Failed to close session cleanly: {}", e);
    } else {
        info!("✅ Connection closed.");
    }

    result
}
