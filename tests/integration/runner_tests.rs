//! Run sequencing integration tests
//!
//! Full runs against the in-memory backend: schema preparation, both
//! suites, phase pauses and teardown.

#[cfg(test)]
mod tests {
    use crate::common::{RecordFactory, fast_config, write_dataset};
    use crate::{assert_err, assert_ok};
    use keyspaces_bench::runner::{self, RunOptions, SINGLE_UPDATE_RATING};
    use keyspaces_bench::storage::{Consistency, MemoryStore, Statement, StoreClient};
    use keyspaces_bench::BenchError;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_full_run_against_memory_store() {
        let store = Arc::new(MemoryStore::new());
        let dataset = write_dataset(&RecordFactory::many(450));
        let options = RunOptions {
            dataset: Some(dataset.path().to_path_buf()),
            ..Default::default()
        };

        let summary = assert_ok!(runner::run_with_client(store.clone(), &fast_config(), &options).await);

        let single = summary.single.as_ref().expect("single suite should run");
        let names: Vec<&str> = single.entries().iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(names, ["Insert", "Read", "Update", "Delete"]);

        let bulk = summary.bulk.as_ref().expect("bulk suite should run");
        assert_eq!(bulk.insert.rows, 450);
        assert_eq!(bulk.insert.batches, 3);
        assert_eq!(bulk.rows_read, 450);
        assert_eq!(bulk.update.succeeded, 450);
        assert_eq!(bulk.delete.rows, 450);
        let phases: Vec<&str> = bulk.timings.entries().iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(phases, ["Bulk Insert", "Bulk Read", "Bulk Update", "Bulk Delete"]);

        let remaining = assert_ok!(
            store
                .execute(&Statement::SelectAllReviews, Consistency::LocalQuorum)
                .await
        )
        .into_rows();
        assert!(remaining.is_empty());

        let rendered = summary.to_string();
        assert!(rendered.contains("📊 Single Operation Timings:"));
        assert!(rendered.contains("📊 Bulk Operation Timings:"));
        assert!(rendered.contains("450/450 succeeded"));
    }

    #[tokio::test]
    async fn test_single_suite_leaves_table_empty() {
        let store = Arc::new(MemoryStore::new());
        let config = fast_config();
        assert_ok!(runner::prepare_schema(store.as_ref(), &config).await);

        let report = assert_ok!(
            runner::run_single_operations(store.as_ref(), Consistency::LocalQuorum).await
        );
        assert_eq!(report.title(), "Single Operation Timings");
        assert_eq!(report.entries().len(), 4);
        assert_eq!(SINGLE_UPDATE_RATING, 4.7);

        let rows = assert_ok!(
            store
                .execute(&Statement::SelectAllReviews, Consistency::LocalQuorum)
                .await
        )
        .into_rows();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_skipped_suites() {
        let store = Arc::new(MemoryStore::new());
        let options = RunOptions {
            dataset: None,
            skip_single: true,
            skip_bulk: true,
        };

        let summary = assert_ok!(runner::run_with_client(store, &fast_config(), &options).await);
        assert!(summary.single.is_none());
        assert!(summary.bulk.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bulk_phases_are_separated_by_pauses() {
        let store = Arc::new(MemoryStore::new());
        let mut config = fast_config();
        config.bench.phase_pause_ms = 10_000;
        let dataset = write_dataset(&RecordFactory::many(5));
        let options = RunOptions {
            dataset: Some(dataset.path().to_path_buf()),
            skip_single: true,
            skip_bulk: false,
        };

        let start = Instant::now();
        assert_ok!(runner::run_with_client(store, &config, &options).await);
        assert!(start.elapsed() >= Duration::from_secs(40));
    }

    #[tokio::test]
    async fn test_drop_on_finish_removes_schema() {
        let store = Arc::new(MemoryStore::new());
        let mut config = fast_config();
        config.bench.drop_on_finish = true;
        let options = RunOptions {
            skip_bulk: true,
            ..Default::default()
        };

        assert_ok!(runner::run_with_client(store.clone(), &config, &options).await);

        let result = store
            .execute(&Statement::SelectAllReviews, Consistency::LocalQuorum)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_opens_configured_backend() {
        let dataset = write_dataset(&RecordFactory::many(20));
        let options = RunOptions {
            dataset: Some(dataset.path().to_path_buf()),
            ..Default::default()
        };

        let summary = assert_ok!(runner::run(&fast_config(), &options).await);
        assert_eq!(summary.bulk.map(|b| b.insert.rows), Some(20));
    }

    #[tokio::test]
    async fn test_unknown_backend_is_config_error() {
        let mut config = fast_config();
        config.store.backend = "scylla".to_string();

        let err = assert_err!(runner::run(&config, &RunOptions::default()).await);
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[cfg(not(feature = "cql"))]
    #[tokio::test]
    async fn test_cql_backend_needs_feature() {
        let mut config = fast_config();
        config.store.backend = "cql".to_string();

        let err = assert_err!(runner::run(&config, &RunOptions::default()).await);
        assert!(err.to_string().contains("`cql` feature"));
    }
}
