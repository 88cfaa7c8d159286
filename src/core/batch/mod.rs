//! Bulk operation engine
//!
//! This module splits a dataset into batches, runs each batch on a bounded
//! worker pool and retries individual records.

mod batcher;
mod retry;
mod scheduler;
mod types;


// Re-export all public types
pub use batcher::split;
pub use retry::RetryPolicy;
pub use scheduler::{BatchScheduler, SchedulerConfig};
pub use types::{Batch, BatchOutcome, OperationResult, ScheduleReport};
