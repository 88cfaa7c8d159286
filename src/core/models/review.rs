//! Review data model
//!
//! `ReviewRecord` is one line of the input dataset; `Review` is a row of the
//! `reviews` table, keyed by `(asin, review_id)`.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One review as read from the newline-delimited JSON dataset
///
/// Unknown fields in the source line are ignored. `rating` and
/// `helpful_vote` accept either JSON numbers or numeric strings and are
/// coerced to the column types of the `reviews` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Product identifier (partition key)
    pub asin: String,
    /// Reviewer identifier
    pub user_id: String,
    /// Review headline
    pub title: String,
    /// Review body
    pub text: String,
    /// Star rating
    #[serde(deserialize_with = "coerce_float")]
    pub rating: f32,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Helpful vote count
    #[serde(deserialize_with = "coerce_int")]
    pub helpful_vote: i32,
    /// Whether the purchase was verified
    pub verified_purchase: bool,
}

/// Primary key of a review row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewKey {
    /// Partition key
    pub asin: String,
    /// Clustering key
    pub review_id: String,
}

impl ReviewKey {
    pub fn new(asin: impl Into<String>, review_id: impl Into<String>) -> Self {
        Self {
            asin: asin.into(),
            review_id: review_id.into(),
        }
    }
}

impl fmt::Display for ReviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.asin, self.review_id)
    }
}

/// A row of the `reviews` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub asin: String,
    pub review_id: String,
    pub user_id: String,
    pub title: String,
    pub text: String,
    pub rating: f32,
    pub timestamp: i64,
    pub helpful_vote: i32,
    pub verified_purchase: bool,
}

impl Review {
    /// Build a row from a dataset record and an explicit review id
    pub fn from_record(record: ReviewRecord, review_id: impl Into<String>) -> Self {
        Self {
            asin: record.asin,
            review_id: review_id.into(),
            user_id: record.user_id,
            title: record.title,
            text: record.text,
            rating: record.rating,
            timestamp: record.timestamp,
            helpful_vote: record.helpful_vote,
            verified_purchase: record.verified_purchase,
        }
    }

    /// Build a row from a dataset record with a freshly generated review id
    pub fn with_generated_id(record: ReviewRecord) -> Self {
        Self::from_record(record, Uuid::new_v4().to_string())
    }

    /// Row written by an upsert against a key that did not exist yet
    ///
    /// Only the key and the updated column carry values.
    pub(crate) fn sparse(key: &ReviewKey, rating: f32) -> Self {
        Self {
            asin: key.asin.clone(),
            review_id: key.review_id.clone(),
            user_id: String::new(),
            title: String::new(),
            text: String::new(),
            rating,
            timestamp: 0,
            helpful_vote: 0,
            verified_purchase: false,
        }
    }

    pub fn key(&self) -> ReviewKey {
        ReviewKey::new(self.asin.clone(), self.review_id.clone())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

fn coerce_float<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("rating {} is not representable", n)))?,
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| de::Error::custom(format!("invalid rating '{}': {}", s, e)))?,
    };
    Ok(value as f32)
}

fn coerce_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => match n.as_i64() {
            Some(i) => i,
            // Whole-valued floats such as `3.0` truncate like an int() cast
            None => n
                .as_f64()
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| de::Error::custom(format!("invalid helpful_vote {}", n)))?,
        },
        NumberOrString::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| de::Error::custom(format!("invalid helpful_vote '{}': {}", s, e)))?,
    };
    i32::try_from(value)
        .map_err(|_| de::Error::custom(format!("helpful_vote {} out of range", value)))
}
