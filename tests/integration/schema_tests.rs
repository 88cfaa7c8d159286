//! Schema administration integration tests
//!
//! Keyspace provisioning with readiness polling, idempotent DDL and
//! teardown.

#[cfg(test)]
mod tests {
    use crate::common::MockStore;
    use crate::{assert_err, assert_ok};
    use keyspaces_bench::config::FaultConfig;
    use keyspaces_bench::storage::{
        self, Consistency, KeyspacePoll, MemoryStore, QueryResult, Statement, StoreClient,
        StoreError,
    };
    use keyspaces_bench::{BenchError, Review};
    use std::time::Duration;
    use tokio::time::Instant;

    fn no_wait(attempts: u32) -> KeyspacePoll {
        KeyspacePoll {
            attempts,
            interval: Duration::ZERO,
        }
    }

    fn slow_keyspace(polls: u32) -> MemoryStore {
        MemoryStore::with_faults(FaultConfig {
            activation_polls: polls,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_keyspace_becomes_active_after_polling() {
        let store = slow_keyspace(3);

        let (name, _) = assert_ok!(
            storage::create_keyspace_if_not_exists(&store, "all_beauty", no_wait(10)).await
        );
        assert_eq!(name, "all_beauty");

        let (table, _) = assert_ok!(storage::create_reviews_table(&store).await);
        assert_eq!(table, storage::REVIEWS_TABLE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyspace_polling_times_out() {
        let store = slow_keyspace(50);
        let start = Instant::now();

        let err = assert_err!(
            storage::create_keyspace_if_not_exists(&store, "all_beauty", KeyspacePoll::default())
                .await
        );

        assert!(matches!(err, BenchError::Setup(_)));
        assert!(err.to_string().contains("all_beauty"));
        // Ten attempts, two seconds apart
        assert_eq!(start.elapsed(), Duration::from_secs(18));
    }

    #[tokio::test]
    async fn test_non_transient_use_failure_propagates_immediately() {
        let mut mock = MockStore::new();
        mock.expect_execute()
            .withf(|statement, _| matches!(statement, Statement::CreateKeyspace { .. }))
            .times(1)
            .returning(|_, _| Ok(QueryResult::Ack));
        mock.expect_execute()
            .withf(|statement, _| matches!(statement, Statement::UseKeyspace { .. }))
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("no hosts".to_string())));

        let err = assert_err!(
            storage::create_keyspace_if_not_exists(&mock, "all_beauty", no_wait(10)).await
        );
        assert!(matches!(err, BenchError::Store(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let store = MemoryStore::new();
        assert_ok!(storage::create_keyspace_if_not_exists(&store, "ks", no_wait(1)).await);
        assert_ok!(storage::create_reviews_table(&store).await);

        let review = Review::from_record(crate::common::RecordFactory::create(1), "r-1");
        assert_ok!(
            store
                .execute(&Statement::InsertReview(review), Consistency::LocalQuorum)
                .await
        );

        assert_ok!(storage::create_keyspace_if_not_exists(&store, "ks", no_wait(1)).await);
        assert_ok!(storage::create_reviews_table(&store).await);

        let rows = assert_ok!(
            store
                .execute(&Statement::SelectAllReviews, Consistency::LocalQuorum)
                .await
        )
        .into_rows();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_drop_table_and_keyspace() {
        let store = MemoryStore::new();
        assert_ok!(storage::create_keyspace_if_not_exists(&store, "ks", no_wait(1)).await);
        assert_ok!(storage::create_reviews_table(&store).await);

        assert_ok!(storage::drop_reviews_table(&store).await);
        let err = assert_err!(
            store
                .execute(&Statement::SelectAllReviews, Consistency::LocalQuorum)
                .await
        );
        assert!(matches!(err, StoreError::InvalidRequest(_)));

        let (name, _) = assert_ok!(storage::drop_keyspace(&store, "ks").await);
        assert_eq!(name, "ks");
        let err = assert_err!(storage::use_keyspace(&store, "ks", no_wait(2)).await);
        assert!(matches!(err, BenchError::Setup(_)));
    }
}
