//! Storage layer for the benchmark
//!
//! This module provides the store session boundary, the in-memory backend,
//! the optional CQL backend and the schema administration helpers.

/// Store session boundary
pub mod client;
/// Driver-backed session for a live cluster
#[cfg(feature = "cql")]
pub mod cql;
/// In-memory backend
pub mod memory;
/// Keyspace and table DDL
pub mod schema;
/// SigV4 challenge signing
pub mod sigv4;

pub use client::{
    Consistency, CqlValue, QueryResult, REVIEW_COLUMNS, SharedStore, Statement, StoreClient,
    StoreError, StoreResult,
};
#[cfg(feature = "cql")]
pub use cql::CqlStore;
pub use memory::MemoryStore;
pub use schema::{
    KeyspacePoll, REVIEWS_TABLE, create_keyspace_if_not_exists, create_reviews_table,
    drop_keyspace, drop_reviews_table, use_keyspace,
};

use crate::config::{FaultConfig, StoreConfig};
use crate::utils::error::{BenchError, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Open a session against the configured backend
pub async fn connect(config: &StoreConfig, faults: &FaultConfig) -> Result<SharedStore> {
    info!(
        "Opening {} session for {}:{} (region {})",
        config.backend,
        config.endpoint,
        config.port,
        config.region.as_deref().unwrap_or("unset")
    );

    match config.backend.as_str() {
        "memory" => {
            debug!(
                "In-memory backend: failure_rate={}, latency_ms={}, activation_polls={}",
                faults.failure_rate, faults.latency_ms, faults.activation_polls
            );
            Ok(Arc::new(MemoryStore::with_faults(faults.clone())))
        }
        #[cfg(feature = "cql")]
        "cql" => {
            debug!("CQL backend: tls={}", config.tls);
            Ok(Arc::new(CqlStore::connect(config).await?))
        }
        #[cfg(not(feature = "cql"))]
        "cql" => Err(BenchError::config(
            "The cql backend requires building with the `cql` feature",
        )),
        other => Err(BenchError::config(format!(
            "Unsupported store backend: {}",
            other
        ))),
    }
}
