//! # keyspaces-bench
//!
//! CRUD latency benchmark for a distributed wide-column review store.
//!
//! ## Features
//!
//! - **Bulk engine**: fixed-size batches dispatched to a bounded worker pool
//! - **Per-record retry**: fixed attempts with a fixed pause, failures counted not raised
//! - **Single-record suite**: insert, read, update and delete of one sample review
//! - **Timing tables**: per-phase wall-clock durations in milliseconds
//! - **Pluggable store**: any [`storage::StoreClient`], with an in-memory backend
//!   that can inject latency and failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keyspaces_bench::{Config, runner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None).await?;
//!     let summary = runner::run(&config, &runner::RunOptions::default()).await?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod core;
pub mod runner;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::batch::{BatchScheduler, RetryPolicy, SchedulerConfig};
pub use core::bulk::{BulkOperations, BulkReport};
pub use core::models::{Review, ReviewKey, ReviewRecord};
pub use core::timing::TimingReport;
pub use storage::{Consistency, MemoryStore, SharedStore, Statement, StoreClient, StoreError};
pub use utils::error::{BenchError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
