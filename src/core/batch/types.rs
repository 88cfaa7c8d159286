//! Types shared by the batch engine

use crate::core::models::ReviewKey;
use crate::storage::StoreError;
use std::time::Duration;

/// Contiguous slice of the input, the unit of work handed to one worker
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    /// Position of this batch in dispatch order
    pub index: usize,
    /// Items in their original order
    pub items: Vec<T>,
}

impl<T> Batch<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Outcome of one record after retries
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    /// Row the operation targeted
    pub key: ReviewKey,
    /// Attempts made, first try included
    pub attempts: u32,
    /// Last error when every attempt failed
    pub error: Option<StoreError>,
}

impl OperationResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of one completed batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Index of the batch
    pub index: usize,
    /// Per-record results in the batch's item order
    pub results: Vec<OperationResult>,
    /// Time the worker spent on the batch
    pub duration: Duration,
}

/// Aggregated results of one scheduler run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleReport {
    /// Completed batches, in completion order
    pub outcomes: Vec<BatchOutcome>,
    /// Wall-clock time from first dispatch to last completion
    pub duration: Duration,
}

impl ScheduleReport {
    /// Number of batches that completed
    pub fn batch_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Every per-record result, batch by batch in completion order
    pub fn results(&self) -> impl Iterator<Item = &OperationResult> {
        self.outcomes.iter().flat_map(|o| o.results.iter())
    }

    pub fn attempted(&self) -> usize {
        self.results().count()
    }

    pub fn succeeded(&self) -> usize {
        self.results().filter(|r| r.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Keys of records whose operation succeeded
    pub fn succeeded_keys(&self) -> Vec<ReviewKey> {
        self.results()
            .filter(|r| r.succeeded())
            .map(|r| r.key.clone())
            .collect()
    }
}
