//! Worker pool that drains a queue of batches
//!
//! A fixed number of workers pull batches from one shared queue, so each
//! batch is claimed by exactly one worker. Completed batches are reported
//! over a completion channel and aggregated by the scheduler. The pool lives
//! for a single [`BatchScheduler::run`] call.

use super::types::{Batch, BatchOutcome, OperationResult, ScheduleReport};
use crate::utils::error::{BenchError, Result};
use crate::utils::progress::progress_bar;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{Instrument, debug, debug_span, error, info};

/// Worker pool settings
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Concurrent workers
    pub max_workers: usize,
    /// Pause between successive batch submissions
    pub submit_delay: Duration,
    /// Draw dispatch and completion progress bars
    pub show_progress: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_workers: 5,
            submit_delay: Duration::from_millis(10),
            show_progress: false,
        }
    }
}

/// Dispatches batches to a bounded pool of workers
#[derive(Debug, Clone, Default)]
pub struct BatchScheduler {
    config: SchedulerConfig,
}

impl BatchScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Process every batch exactly once and wait for all of them
    ///
    /// `process` runs once per batch on whichever worker claims it. Record
    /// failures belong in the returned results; an `Err` from `process`, or
    /// a panicking worker, is treated as a pool failure: the remaining
    /// workers and the dispatcher are aborted and the error is returned.
    /// Batches that had already completed are discarded in that case.
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        batches: Vec<Batch<T>>,
        process: F,
    ) -> Result<ScheduleReport>
    where
        T: Send + 'static,
        F: Fn(Batch<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<OperationResult>>> + Send + 'static,
    {
        let total = batches.len();
        let workers = self.config.max_workers.max(1);
        let start = Instant::now();
        info!(
            "{}: dispatching {} batches to {} workers",
            label, total, workers
        );

        let dispatch_bar = progress_bar(total, format!("📦 {}", label), self.config.show_progress);
        let done_bar = progress_bar(total, "🔄 Processing Batches", self.config.show_progress);

        let (queue_tx, queue_rx) = mpsc::channel::<Batch<T>>(workers);
        let queue_rx = Arc::new(Mutex::new(queue_rx));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<BatchOutcome>();
        let process = Arc::new(process);

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            let queue = Arc::clone(&queue_rx);
            let done = done_tx.clone();
            let process = Arc::clone(&process);

            pool.spawn(
                async move {
                    loop {
                        let next = {
                            let mut guard = queue.lock().await;
                            guard.recv().await
                        };
                        let Some(batch) = next else { break };

                        let index = batch.index;
                        let size = batch.len();
                        let started = Instant::now();
                        debug!(batch = index, size, "batch claimed");

                        let results = (*process)(batch).await?;
                        let outcome = BatchOutcome {
                            index,
                            results,
                            duration: started.elapsed(),
                        };
                        if done.send(outcome).is_err() {
                            break;
                        }
                    }
                    Ok::<(), BenchError>(())
                }
                .instrument(debug_span!("worker", id = worker_id)),
            );
        }
        drop(done_tx);
        drop(queue_rx);

        let submit_delay = self.config.submit_delay;
        let dispatcher = tokio::spawn(async move {
            for batch in batches {
                if queue_tx.send(batch).await.is_err() {
                    break;
                }
                dispatch_bar.inc(1);
                if !submit_delay.is_zero() {
                    tokio::time::sleep(submit_delay).await;
                }
            }
            dispatch_bar.finish();
        });

        let mut outcomes = Vec::with_capacity(total);
        let failure = loop {
            tokio::select! {
                Some(outcome) = done_rx.recv() => {
                    done_bar.inc(1);
                    outcomes.push(outcome);
                }
                joined = pool.join_next() => match joined {
                    None => break None,
                    Some(Ok(Ok(()))) => {}
                    Some(Ok(Err(e))) => break Some(e),
                    Some(Err(join_err)) => {
                        break Some(BenchError::worker(format!("worker task failed: {}", join_err)));
                    }
                },
            }
        };

        if let Some(err) = failure {
            pool.abort_all();
            dispatcher.abort();
            done_bar.abandon();
            error!(
                "{}: aborting after {} of {} batches: {}",
                label,
                outcomes.len(),
                total,
                err
            );
            return Err(err);
        }

        // Workers have exited; collect whatever is still queued
        while let Ok(outcome) = done_rx.try_recv() {
            done_bar.inc(1);
            outcomes.push(outcome);
        }
        done_bar.finish();

        dispatcher
            .await
            .map_err(|e| BenchError::worker(format!("dispatcher failed: {}", e)))?;

        if outcomes.len() != total {
            return Err(BenchError::worker(format!(
                "{}: only {} of {} batches completed",
                label,
                outcomes.len(),
                total
            )));
        }

        let report = ScheduleReport {
            outcomes,
            duration: start.elapsed(),
        };
        info!(
            "{}: {} batches done, {}/{} records succeeded in {:?}",
            label,
            report.batch_count(),
            report.succeeded(),
            report.attempted(),
            report.duration
        );
        Ok(report)
    }
}
