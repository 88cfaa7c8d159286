//! Keyspace and table administration
//!
//! One-shot DDL helpers. Each returns the object name and how long the
//! statement took, in milliseconds.

use super::client::{Consistency, Statement, StoreClient, StoreError};
use crate::core::timing::elapsed_ms;
use crate::utils::error::{BenchError, Result};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Name of the benchmark table
pub const REVIEWS_TABLE: &str = "reviews";

/// How long to wait for a freshly created keyspace to become usable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyspacePoll {
    /// Number of `USE` attempts
    pub attempts: u32,
    /// Pause between attempts
    pub interval: Duration,
}

impl Default for KeyspacePoll {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_secs(2),
        }
    }
}

/// Create the keyspace if absent and wait until the session can use it
///
/// The returned duration covers only the create statement, not the wait.
pub async fn create_keyspace_if_not_exists(
    client: &dyn StoreClient,
    name: &str,
    poll: KeyspacePoll,
) -> Result<(String, f64)> {
    let start = Instant::now();
    client
        .execute(
            &Statement::CreateKeyspace {
                name: name.to_string(),
            },
            Consistency::LocalQuorum,
        )
        .await?;
    let create_ms = elapsed_ms(start);
    info!("Keyspace '{}' creation triggered in {} ms", name, create_ms);

    use_keyspace(client, name, poll).await?;
    Ok((name.to_string(), create_ms))
}

/// Switch the session to `name`, polling while the keyspace is provisioned
pub async fn use_keyspace(client: &dyn StoreClient, name: &str, poll: KeyspacePoll) -> Result<()> {
    let statement = Statement::UseKeyspace {
        name: name.to_string(),
    };

    for attempt in 1..=poll.attempts {
        match client.execute(&statement, Consistency::LocalQuorum).await {
            Ok(_) => {
                info!("Keyspace '{}' is active", name);
                return Ok(());
            }
            Err(StoreError::KeyspaceNotReady(_) | StoreError::InvalidRequest(_)) => {
                warn!(
                    "Waiting for keyspace '{}' to be available... retry {}",
                    name, attempt
                );
                if attempt < poll.attempts {
                    tokio::time::sleep(poll.interval).await;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(BenchError::setup(format!(
        "Timed out waiting for keyspace '{}' to become active after {} attempts",
        name, poll.attempts
    )))
}

/// Create the `reviews` table in the current keyspace
pub async fn create_reviews_table(client: &dyn StoreClient) -> Result<(String, f64)> {
    let ms = timed_ddl(client, Statement::CreateReviewsTable).await?;
    info!("Table '{}' created in {} ms", REVIEWS_TABLE, ms);
    Ok((REVIEWS_TABLE.to_string(), ms))
}

/// Drop the `reviews` table if it exists
pub async fn drop_reviews_table(client: &dyn StoreClient) -> Result<(String, f64)> {
    let ms = timed_ddl(client, Statement::DropReviewsTable).await?;
    info!("Table '{}' dropped in {} ms", REVIEWS_TABLE, ms);
    Ok((REVIEWS_TABLE.to_string(), ms))
}

/// Drop a keyspace if it exists
pub async fn drop_keyspace(client: &dyn StoreClient, name: &str) -> Result<(String, f64)> {
    let ms = timed_ddl(
        client,
        Statement::DropKeyspace {
            name: name.to_string(),
        },
    )
    .await?;
    info!("Keyspace '{}' dropped in {} ms", name, ms);
    Ok((name.to_string(), ms))
}

async fn timed_ddl(client: &dyn StoreClient, statement: Statement) -> Result<f64> {
    let start = Instant::now();
    client.execute(&statement, Consistency::LocalQuorum).await?;
    Ok(elapsed_ms(start))
}
