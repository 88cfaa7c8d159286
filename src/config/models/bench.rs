//! Benchmark run configuration

use super::*;
use crate::core::batch::{RetryPolicy, SchedulerConfig};
use crate::storage::KeyspacePoll;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Benchmark run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Records per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Concurrent workers per bulk phase
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Attempts per record, first try included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed pause between attempts of one record
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Pause between successive batch submissions
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
    /// Pause after each bulk phase
    #[serde(default = "default_phase_pause_ms")]
    pub phase_pause_ms: u64,
    /// Keyspace readiness polls
    #[serde(default = "default_keyspace_poll_attempts")]
    pub keyspace_poll_attempts: u32,
    /// Pause between keyspace readiness polls
    #[serde(default = "default_keyspace_poll_interval_ms")]
    pub keyspace_poll_interval_ms: u64,
    /// Newline-delimited JSON dataset for the bulk insert
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Rating increment applied by the bulk update
    #[serde(default = "default_boost")]
    pub boost: f32,
    /// Draw progress bars
    #[serde(default = "default_true")]
    pub show_progress: bool,
    /// Drop the table and keyspace after the run
    #[serde(default)]
    pub drop_on_finish: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_workers: default_max_workers(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            submit_delay_ms: default_submit_delay_ms(),
            phase_pause_ms: default_phase_pause_ms(),
            keyspace_poll_attempts: default_keyspace_poll_attempts(),
            keyspace_poll_interval_ms: default_keyspace_poll_interval_ms(),
            dataset: default_dataset(),
            boost: default_boost(),
            show_progress: true,
            drop_on_finish: false,
        }
    }
}

impl BenchConfig {
    /// Per-record retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }

    /// Worker pool settings for one bulk phase
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            max_workers: self.max_workers,
            submit_delay: Duration::from_millis(self.submit_delay_ms),
            show_progress: self.show_progress,
        }
    }

    /// Keyspace readiness polling
    pub fn keyspace_poll(&self) -> KeyspacePoll {
        KeyspacePoll {
            attempts: self.keyspace_poll_attempts,
            interval: Duration::from_millis(self.keyspace_poll_interval_ms),
        }
    }

    /// Pause between bulk phases
    pub fn phase_pause(&self) -> Duration {
        Duration::from_millis(self.phase_pause_ms)
    }
}
