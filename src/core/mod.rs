//! Core functionality for the benchmark
//!
//! This module contains the review model, the dataset loader, the batch
//! engine, the bulk and single-record operations and the timing report.

pub mod batch;
pub mod bulk;
pub mod models;
pub mod single;
pub mod source;
pub mod timing;

// Re-export commonly used types
pub use bulk::{BulkOperations, BulkReport};
pub use models::{Review, ReviewKey, ReviewRecord};
pub use timing::{TimingRecord, TimingReport};
