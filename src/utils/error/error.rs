//! Error types for the benchmark harness

use crate::storage::StoreError;
use thiserror::Error;

/// Result type alias for the benchmark harness
pub type Result<T> = std::result::Result<T, BenchError>;

/// Main error type for the benchmark harness
///
/// Only failures that abort a run surface here. Per-record store failures
/// are retried, counted and logged by the bulk engine instead.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Keyspace or table never became usable
    #[error("Setup error: {0}")]
    Setup(String),

    /// A dataset line is not a well-formed review record
    #[error("Parse error on line {line}: {source}")]
    Parse {
        /// 1-based line number in the dataset file
        line: usize,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Store call that is not covered by per-record retry
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Worker crashed or the pool itself failed
    #[error("Worker error: {0}")]
    Worker(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a setup error
    pub fn setup(msg: impl Into<String>) -> Self {
        Self::Setup(msg.into())
    }

    /// Create a worker error
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }
}
