//! Bulk operation integration tests
//!
//! End-to-end scenarios for insert, read, update and delete through the
//! batch engine, plus partial-failure and fatal-error behaviour.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::write_lines;
    use crate::common::{MockStore, RecordFactory, fast_config, ready_store, write_dataset};
    use crate::{assert_err, assert_ok};
    use keyspaces_bench::config::FaultConfig;
    use keyspaces_bench::core::single::read_single_review;
    use keyspaces_bench::storage::{Consistency, QueryResult, Statement, StoreError};
    use keyspaces_bench::{BenchError, BulkOperations, Review, ReviewKey};
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Happy Path ====================

    #[tokio::test]
    async fn test_insert_450_records_in_three_batches() {
        let store = ready_store(FaultConfig::default()).await;
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());
        let dataset = write_dataset(&RecordFactory::many(450));

        let report = assert_ok!(bulk.bulk_insert(dataset.path()).await);

        assert_eq!(report.operation, "Bulk Insert");
        assert_eq!(report.batches, 3);
        assert_eq!(report.attempted, 450);
        assert_eq!(report.succeeded, 450);
        assert_eq!(report.failed, 0);
        assert_eq!(report.rows, 450);
        assert_eq!(report.inserted_ids.len(), 450);

        let (rows, _) = assert_ok!(bulk.read_all().await);
        assert_eq!(rows.len(), 450);

        let read_keys: HashSet<ReviewKey> = rows.iter().map(Review::key).collect();
        let inserted: HashSet<ReviewKey> = report.inserted_ids.into_iter().collect();
        assert_eq!(read_keys, inserted);
    }

    #[tokio::test]
    async fn test_insert_counts_only_new_rows() {
        let store = ready_store(FaultConfig::default()).await;
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());

        let first = write_dataset(&RecordFactory::many(30));
        assert_ok!(bulk.bulk_insert(first.path()).await);

        let second = write_dataset(&RecordFactory::many(12));
        let report = assert_ok!(bulk.bulk_insert(second.path()).await);

        assert_eq!(report.rows, 12);
        assert_eq!(assert_ok!(bulk.count_rows().await), 42);
    }

    #[tokio::test]
    async fn test_update_applies_boost() {
        let store = ready_store(FaultConfig::default()).await;
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());

        let mut record = RecordFactory::create(0);
        record.rating = 4.0;
        let dataset = write_dataset(&[record]);
        let inserted = assert_ok!(bulk.bulk_insert(dataset.path()).await);
        let key = inserted.inserted_ids[0].clone();

        let report = assert_ok!(bulk.update_all_ratings(0.5).await);
        assert_eq!(report.rows, 1);
        assert_eq!(report.succeeded, 1);

        let (row, _) = assert_ok!(
            read_single_review(
                store.as_ref(),
                &key.asin,
                &key.review_id,
                Consistency::LocalQuorum
            )
            .await
        );
        assert_eq!(row.map(|r| r.rating), Some(4.5));
    }

    #[tokio::test]
    async fn test_update_leaves_other_columns_untouched() {
        let store = ready_store(FaultConfig::default()).await;
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());
        let dataset = write_dataset(&RecordFactory::many(25));
        assert_ok!(bulk.bulk_insert(dataset.path()).await);

        let (before, _) = assert_ok!(bulk.read_all().await);
        assert_ok!(bulk.update_all_ratings(0.5).await);
        let (after, _) = assert_ok!(bulk.read_all().await);

        assert_eq!(before.len(), after.len());
        for (old, new) in before.iter().zip(&after) {
            assert_eq!(new.rating, old.rating + 0.5);
            assert_eq!(new.title, old.title);
            assert_eq!(new.helpful_vote, old.helpful_vote);
        }
    }

    #[tokio::test]
    async fn test_delete_removes_every_row() {
        let store = ready_store(FaultConfig::default()).await;
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());
        let dataset = write_dataset(&RecordFactory::many(213));
        assert_ok!(bulk.bulk_insert(dataset.path()).await);

        let report = assert_ok!(bulk.delete_all().await);
        assert_eq!(report.rows, 213);
        assert_eq!(report.succeeded, 213);
        assert_eq!(report.batches, 2);

        let (rows, _) = assert_ok!(bulk.read_all().await);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_operations_on_empty_table() {
        let store = ready_store(FaultConfig::default()).await;
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());

        let update = assert_ok!(bulk.update_all_ratings(0.5).await);
        let delete = assert_ok!(bulk.delete_all().await);

        assert_eq!(update.attempted, 0);
        assert_eq!(update.batches, 0);
        assert_eq!(delete.rows, 0);
    }

    #[tokio::test]
    async fn test_round_trip_with_numeric_coercion() {
        let store = ready_store(FaultConfig::default()).await;
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());

        let mut record = RecordFactory::create(3);
        record.rating = 3.5;
        record.helpful_vote = 12;
        let dataset = write_lines(&[RecordFactory::stringly_line(&record)]);

        let report = assert_ok!(bulk.bulk_insert(dataset.path()).await);
        let key = report.inserted_ids[0].clone();

        let (row, _) = assert_ok!(
            read_single_review(
                store.as_ref(),
                &key.asin,
                &key.review_id,
                Consistency::LocalQuorum
            )
            .await
        );
        let row = row.expect("inserted row should be readable");
        assert_eq!(row, Review::from_record(record, key.review_id.clone()));
        assert_eq!(row.rating, 3.5);
        assert_eq!(row.helpful_vote, 12);
    }

    // ==================== Partial Failure ====================

    #[tokio::test]
    async fn test_poisoned_partition_does_not_affect_siblings() {
        let store = ready_store(FaultConfig::default()).await;
        store.poison_partition("POISONED");
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());

        let records: Vec<_> = (0..300)
            .map(|i| {
                if i % 10 == 0 {
                    RecordFactory::in_partition(i, "POISONED")
                } else {
                    RecordFactory::create(i)
                }
            })
            .collect();
        let dataset = write_dataset(&records);

        let report = assert_ok!(bulk.bulk_insert(dataset.path()).await);
        assert_eq!(report.attempted, 300);
        assert_eq!(report.failed, 30);
        assert_eq!(report.succeeded, 270);
        assert_eq!(report.rows, 270);
        assert!(report.inserted_ids.iter().all(|k| k.asin != "POISONED"));

        let (rows, _) = assert_ok!(bulk.read_all().await);
        assert_eq!(rows.len(), 270);
    }

    #[tokio::test]
    async fn test_all_mutations_failing_is_not_fatal() {
        let faults = FaultConfig {
            failure_rate: 1.0,
            ..Default::default()
        };
        let store = ready_store(faults).await;
        let bulk = BulkOperations::from_config(store.clone(), &fast_config());
        let dataset = write_dataset(&RecordFactory::many(40));

        let report = assert_ok!(bulk.bulk_insert(dataset.path()).await);
        assert_eq!(report.failed, 40);
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.rows, 0);
        assert!(report.inserted_ids.is_empty());
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let seen = Arc::new(Mutex::new(HashSet::new()));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut mock = MockStore::new();
        {
            let seen = seen.clone();
            let calls = calls.clone();
            mock.expect_execute().returning(move |statement, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                match statement {
                    Statement::SelectAllReviews => Ok(QueryResult::Rows(Vec::new())),
                    Statement::InsertReview(review) => {
                        // First write of every key times out
                        if seen.lock().insert(review.key()) {
                            Err(StoreError::Timeout("coordinator timeout".to_string()))
                        } else {
                            Ok(QueryResult::Ack)
                        }
                    }
                    other => panic!("unexpected statement: {}", other.cql()),
                }
            });
        }

        let bulk = BulkOperations::from_config(Arc::new(mock), &fast_config());
        let dataset = write_dataset(&RecordFactory::many(50));
        let report = assert_ok!(bulk.bulk_insert(dataset.path()).await);

        assert_eq!(report.succeeded, 50);
        assert_eq!(report.failed, 0);
        // Two counts plus two attempts per record
        assert_eq!(calls.load(Ordering::SeqCst), 2 + 50 * 2);
    }

    // ==================== Fatal Errors ====================

    #[tokio::test]
    async fn test_parse_error_aborts_before_any_store_call() {
        let mut mock = MockStore::new();
        mock.expect_execute().times(0);

        let bulk = BulkOperations::from_config(Arc::new(mock), &fast_config());
        let good = serde_json::to_string(&RecordFactory::create(0)).unwrap();
        let dataset = write_lines(&[good.as_str(), "{\"asin\": \"B0\", \"rating\": "]);

        let err = assert_err!(bulk.bulk_insert(dataset.path()).await);
        assert!(matches!(err, BenchError::Parse { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_blank_line_aborts_before_any_store_call() {
        let mut mock = MockStore::new();
        mock.expect_execute().times(0);

        let bulk = BulkOperations::from_config(Arc::new(mock), &fast_config());
        let good = serde_json::to_string(&RecordFactory::create(0)).unwrap();
        let dataset = write_lines(&[good.as_str(), "", good.as_str()]);

        let err = assert_err!(bulk.bulk_insert(dataset.path()).await);
        assert!(matches!(err, BenchError::Parse { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_missing_dataset_is_io_error() {
        let mut mock = MockStore::new();
        mock.expect_execute().times(0);

        let bulk = BulkOperations::from_config(Arc::new(mock), &fast_config());
        let err = assert_err!(bulk.bulk_insert("/nonexistent/reviews.jsonl").await);
        assert!(matches!(err, BenchError::Io(_)));
    }

    #[tokio::test]
    async fn test_failed_scan_is_fatal() {
        let mut mock = MockStore::new();
        mock.expect_execute()
            .withf(|statement, consistency| {
                matches!(statement, Statement::SelectAllReviews)
                    && *consistency == Consistency::LocalQuorum
            })
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("1 replica required".to_string())));

        let bulk = BulkOperations::from_config(Arc::new(mock), &fast_config());
        let err = assert_err!(bulk.delete_all().await);
        assert!(matches!(err, BenchError::Store(StoreError::Unavailable(_))));
    }
}
