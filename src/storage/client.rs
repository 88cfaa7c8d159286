//! Store client boundary
//!
//! The benchmark talks to the review store only through [`StoreClient`].
//! Implementations must be safe to call from many workers at once; any
//! connection pooling lives behind the trait.

use crate::core::models::{Review, ReviewKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Shared handle to a store session
pub type SharedStore = Arc<dyn StoreClient>;

/// Failure reported by a store call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Coordinator timed out waiting for replicas
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Store is throttling requests
    #[error("Overloaded: {0}")]
    Overloaded(String),

    /// Not enough replicas for the requested consistency
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Malformed statement or missing schema object
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Keyspace exists but is still being provisioned
    #[error("Keyspace not ready: {0}")]
    KeyspaceNotReady(String),

    /// Anything else the driver reports
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether retrying the same statement could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Timeout(_)
                | StoreError::Overloaded(_)
                | StoreError::Unavailable(_)
                | StoreError::KeyspaceNotReady(_)
        )
    }
}

/// Consistency level requested per statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    One,
    LocalOne,
    Quorum,
    #[default]
    LocalQuorum,
    All,
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Consistency::One => "ONE",
            Consistency::LocalOne => "LOCAL_ONE",
            Consistency::Quorum => "QUORUM",
            Consistency::LocalQuorum => "LOCAL_QUORUM",
            Consistency::All => "ALL",
        };
        f.write_str(name)
    }
}

/// Positional statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum CqlValue {
    Text(String),
    Float(f32),
    BigInt(i64),
    Int(i32),
    Boolean(bool),
}

/// Column order shared by inserts and selects
pub const REVIEW_COLUMNS: [&str; 9] = [
    "asin",
    "review_id",
    "user_id",
    "title",
    "text",
    "rating",
    "timestamp",
    "helpful_vote",
    "verified_purchase",
];

const INSERT_REVIEW_CQL: &str = "INSERT INTO reviews (asin, review_id, user_id, title, text, rating, timestamp, helpful_vote, verified_purchase) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

const CREATE_REVIEWS_TABLE_CQL: &str = "CREATE TABLE IF NOT EXISTS reviews (\
asin text, review_id text, user_id text, title text, text text, rating float, \
timestamp bigint, helpful_vote int, verified_purchase boolean, \
PRIMARY KEY (asin, review_id))";

/// Every statement the benchmark issues
///
/// Table statements run against the session's current keyspace, selected
/// with [`Statement::UseKeyspace`].
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateKeyspace { name: String },
    UseKeyspace { name: String },
    DropKeyspace { name: String },
    CreateReviewsTable,
    DropReviewsTable,
    InsertReview(Review),
    SelectAllReviews,
    SelectReview { key: ReviewKey },
    UpdateRating { key: ReviewKey, rating: f32 },
    DeleteReview { key: ReviewKey },
}

impl Statement {
    /// CQL text with `?` placeholders for [`Statement::params`]
    pub fn cql(&self) -> String {
        match self {
            Statement::CreateKeyspace { name } => format!(
                "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = {{'class': 'SingleRegionStrategy'}}",
                name
            ),
            Statement::UseKeyspace { name } => format!("USE {}", name),
            Statement::DropKeyspace { name } => format!("DROP KEYSPACE IF EXISTS {}", name),
            Statement::CreateReviewsTable => CREATE_REVIEWS_TABLE_CQL.to_string(),
            Statement::DropReviewsTable => "DROP TABLE IF EXISTS reviews".to_string(),
            Statement::InsertReview(_) => INSERT_REVIEW_CQL.to_string(),
            Statement::SelectAllReviews => {
                format!("SELECT {} FROM reviews", REVIEW_COLUMNS.join(", "))
            }
            Statement::SelectReview { .. } => format!(
                "SELECT {} FROM reviews WHERE asin=? AND review_id=?",
                REVIEW_COLUMNS.join(", ")
            ),
            Statement::UpdateRating { .. } => {
                "UPDATE reviews SET rating=? WHERE asin=? AND review_id=?".to_string()
            }
            Statement::DeleteReview { .. } => {
                "DELETE FROM reviews WHERE asin=? AND review_id=?".to_string()
            }
        }
    }

    /// Positional parameters in placeholder order
    pub fn params(&self) -> Vec<CqlValue> {
        match self {
            Statement::InsertReview(review) => vec![
                CqlValue::Text(review.asin.clone()),
                CqlValue::Text(review.review_id.clone()),
                CqlValue::Text(review.user_id.clone()),
                CqlValue::Text(review.title.clone()),
                CqlValue::Text(review.text.clone()),
                CqlValue::Float(review.rating),
                CqlValue::BigInt(review.timestamp),
                CqlValue::Int(review.helpful_vote),
                CqlValue::Boolean(review.verified_purchase),
            ],
            Statement::SelectReview { key } | Statement::DeleteReview { key } => vec![
                CqlValue::Text(key.asin.clone()),
                CqlValue::Text(key.review_id.clone()),
            ],
            Statement::UpdateRating { key, rating } => vec![
                CqlValue::Float(*rating),
                CqlValue::Text(key.asin.clone()),
                CqlValue::Text(key.review_id.clone()),
            ],
            _ => Vec::new(),
        }
    }

    /// Whether the statement writes row data
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Statement::InsertReview(_)
                | Statement::UpdateRating { .. }
                | Statement::DeleteReview { .. }
        )
    }

    /// Primary key targeted by a row-level statement
    pub fn target_key(&self) -> Option<ReviewKey> {
        match self {
            Statement::InsertReview(review) => Some(review.key()),
            Statement::SelectReview { key }
            | Statement::UpdateRating { key, .. }
            | Statement::DeleteReview { key } => Some(key.clone()),
            _ => None,
        }
    }
}

/// Outcome of a successful store call
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Statement applied, nothing to return
    Ack,
    /// Rows returned by a select
    Rows(Vec<Review>),
}

impl QueryResult {
    /// Returned rows; empty for acknowledgements
    pub fn into_rows(self) -> Vec<Review> {
        match self {
            QueryResult::Ack => Vec::new(),
            QueryResult::Rows(rows) => rows,
        }
    }
}

/// Session capability for the review store
#[async_trait::async_trait]
pub trait StoreClient: Send + Sync {
    /// Execute one statement at the given consistency level
    async fn execute(
        &self,
        statement: &Statement,
        consistency: Consistency,
    ) -> StoreResult<QueryResult>;

    /// Release the session
    async fn shutdown(&self) -> StoreResult<()> {
        Ok(())
    }
}
