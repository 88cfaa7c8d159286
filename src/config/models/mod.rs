//! Configuration data models
//!
//! This module defines all configuration structures used by the benchmark.

pub mod bench;
pub mod logging;
pub mod store;

// Re-export all configuration types
pub use bench::*;
pub use logging::*;
pub use store::*;

/// Default store endpoint
pub fn default_endpoint() -> String {
    "cassandra.us-east-2.amazonaws.com".to_string()
}

/// Default store port (TLS)
pub fn default_port() -> u16 {
    9142
}

/// TLS is on unless disabled
pub fn default_tls() -> bool {
    true
}

/// Default backend
pub fn default_backend() -> String {
    "memory".to_string()
}

/// Default keyspace name
pub fn default_keyspace() -> String {
    "all_beauty".to_string()
}

/// Default records per batch
pub fn default_batch_size() -> usize {
    200
}

/// Default worker count
pub fn default_max_workers() -> usize {
    5
}

/// Default attempts per record
pub fn default_max_attempts() -> u32 {
    3
}

/// Default pause between record attempts in milliseconds
pub fn default_retry_backoff_ms() -> u64 {
    500
}

/// Default pause between batch submissions in milliseconds
pub fn default_submit_delay_ms() -> u64 {
    10
}

/// Default pause between bulk phases in milliseconds
pub fn default_phase_pause_ms() -> u64 {
    10_000
}

/// Default keyspace readiness polls
pub fn default_keyspace_poll_attempts() -> u32 {
    10
}

/// Default pause between keyspace readiness polls in milliseconds
pub fn default_keyspace_poll_interval_ms() -> u64 {
    2_000
}

/// Default dataset path
pub fn default_dataset() -> String {
    "data/All_Beauty.jsonl".to_string()
}

/// Default rating boost applied by the bulk update phase
pub fn default_boost() -> f32 {
    0.5
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
