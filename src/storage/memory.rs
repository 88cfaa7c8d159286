//! In-memory review store
//!
//! Emulates the parts of a managed wide-column store the benchmark relies
//! on: idempotent DDL, keyspaces that take a few polls to become usable,
//! upsert writes and full-table scans in primary-key order. Optional fault
//! injection makes retry and sibling-isolation behaviour observable.

use super::client::{Consistency, QueryResult, Statement, StoreClient, StoreError, StoreResult};
use crate::config::FaultConfig;
use crate::core::models::{Review, ReviewKey};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, trace};

type ReviewTable = BTreeMap<ReviewKey, Review>;

#[derive(Debug, Default)]
struct Keyspace {
    /// Failed `USE` attempts left before the keyspace turns active
    pending_polls: u32,
    reviews: Option<ReviewTable>,
}

#[derive(Debug, Default)]
struct MemoryState {
    keyspaces: HashMap<String, Keyspace>,
    current: Option<String>,
}

/// Thread-safe in-memory [`StoreClient`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    faults: FaultConfig,
    poisoned: RwLock<HashSet<String>>,
}

impl MemoryStore {
    /// Create an empty store with no fault injection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given fault profile
    pub fn with_faults(faults: FaultConfig) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    /// Make every mutation on `asin` fail with a non-transient error
    pub fn poison_partition(&self, asin: impl Into<String>) {
        self.poisoned.write().insert(asin.into());
    }

    /// Apply a statement to the current state
    fn apply(&self, statement: &Statement) -> StoreResult<QueryResult> {
        let mut state = self.state.write();
        match statement {
            Statement::CreateKeyspace { name } => {
                let activation_polls = self.faults.activation_polls;
                state
                    .keyspaces
                    .entry(name.clone())
                    .or_insert_with(|| Keyspace {
                        pending_polls: activation_polls,
                        reviews: None,
                    });
                Ok(QueryResult::Ack)
            }
            Statement::UseKeyspace { name } => {
                let keyspace = state.keyspaces.get_mut(name).ok_or_else(|| {
                    StoreError::InvalidRequest(format!("Keyspace '{}' does not exist", name))
                })?;
                if keyspace.pending_polls > 0 {
                    keyspace.pending_polls -= 1;
                    return Err(StoreError::KeyspaceNotReady(format!(
                        "Keyspace '{}' is still being created",
                        name
                    )));
                }
                state.current = Some(name.clone());
                Ok(QueryResult::Ack)
            }
            Statement::DropKeyspace { name } => {
                state.keyspaces.remove(name);
                if state.current.as_deref() == Some(name.as_str()) {
                    state.current = None;
                }
                Ok(QueryResult::Ack)
            }
            Statement::CreateReviewsTable => {
                let keyspace = current_keyspace(&mut state)?;
                keyspace.reviews.get_or_insert_with(BTreeMap::new);
                Ok(QueryResult::Ack)
            }
            Statement::DropReviewsTable => {
                current_keyspace(&mut state)?.reviews = None;
                Ok(QueryResult::Ack)
            }
            Statement::InsertReview(review) => {
                reviews_table(&mut state)?.insert(review.key(), review.clone());
                Ok(QueryResult::Ack)
            }
            Statement::SelectAllReviews => {
                let rows = reviews_table(&mut state)?.values().cloned().collect();
                Ok(QueryResult::Rows(rows))
            }
            Statement::SelectReview { key } => {
                let rows = reviews_table(&mut state)?
                    .get(key)
                    .cloned()
                    .into_iter()
                    .collect();
                Ok(QueryResult::Rows(rows))
            }
            Statement::UpdateRating { key, rating } => {
                // Updates are upserts, as in the wide-column model
                reviews_table(&mut state)?
                    .entry(key.clone())
                    .and_modify(|row| row.rating = *rating)
                    .or_insert_with(|| Review::sparse(key, *rating));
                Ok(QueryResult::Ack)
            }
            Statement::DeleteReview { key } => {
                reviews_table(&mut state)?.remove(key);
                Ok(QueryResult::Ack)
            }
        }
    }

    /// Injected failure for a mutation, if any
    fn injected_fault(&self, statement: &Statement) -> Option<StoreError> {
        if !statement.is_mutation() {
            return None;
        }
        if let Some(key) = statement.target_key() {
            if self.poisoned.read().contains(&key.asin) {
                return Some(StoreError::InvalidRequest(format!(
                    "partition '{}' rejects writes",
                    key.asin
                )));
            }
        }
        if self.faults.failure_rate > 0.0 && rand::random::<f64>() < self.faults.failure_rate {
            return Some(StoreError::Timeout(
                "Operation timed out - received only 1 responses".to_string(),
            ));
        }
        None
    }
}

fn current_keyspace(state: &mut MemoryState) -> StoreResult<&mut Keyspace> {
    let name = state.current.clone().ok_or_else(|| {
        StoreError::InvalidRequest("No keyspace has been specified".to_string())
    })?;
    state
        .keyspaces
        .get_mut(&name)
        .ok_or_else(|| StoreError::InvalidRequest(format!("Keyspace '{}' does not exist", name)))
}

fn reviews_table(state: &mut MemoryState) -> StoreResult<&mut ReviewTable> {
    current_keyspace(state)?
        .reviews
        .as_mut()
        .ok_or_else(|| StoreError::InvalidRequest("unconfigured table reviews".to_string()))
}

#[async_trait::async_trait]
impl StoreClient for MemoryStore {
    async fn execute(
        &self,
        statement: &Statement,
        consistency: Consistency,
    ) -> StoreResult<QueryResult> {
        trace!(cql = %statement.cql(), %consistency, "executing statement");

        if self.faults.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.faults.latency_ms)).await;
        }

        if let Some(err) = self.injected_fault(statement) {
            debug!("Injected fault: {}", err);
            return Err(err);
        }

        self.apply(statement)
    }
}
