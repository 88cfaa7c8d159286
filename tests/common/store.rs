//! Store helpers for tests
//!
//! In-memory stores with the keyspace and table already created, a
//! configuration with every pause set to zero, and a mock session.

use async_trait::async_trait;
use keyspaces_bench::config::{Config, FaultConfig};
use keyspaces_bench::storage::{
    self, Consistency, KeyspacePoll, MemoryStore, QueryResult, Statement, StoreClient,
    StoreResult,
};
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl StoreClient for Store {
        async fn execute(
            &self,
            statement: &Statement,
            consistency: Consistency,
        ) -> StoreResult<QueryResult>;
        async fn shutdown(&self) -> StoreResult<()>;
    }
}

/// Default configuration with no waiting anywhere
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.store.keyspace = "bench_test".to_string();
    config.bench.retry_backoff_ms = 0;
    config.bench.submit_delay_ms = 0;
    config.bench.phase_pause_ms = 0;
    config.bench.keyspace_poll_interval_ms = 0;
    config.bench.show_progress = false;
    config
}

/// In-memory store with `bench_test.reviews` ready
pub async fn ready_store(faults: FaultConfig) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::with_faults(faults));
    let poll = KeyspacePoll {
        attempts: 10,
        interval: std::time::Duration::ZERO,
    };
    storage::create_keyspace_if_not_exists(store.as_ref(), "bench_test", poll)
        .await
        .unwrap();
    storage::create_reviews_table(store.as_ref()).await.unwrap();
    store
}
