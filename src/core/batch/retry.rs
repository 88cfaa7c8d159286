//! Bounded retry for single-record store calls
//!
//! Every error is retried the same way: a fixed number of attempts with a
//! fixed pause in between. A record that exhausts its attempts is reported
//! as failed and never aborts its siblings.

use super::types::OperationResult;
use crate::core::models::ReviewKey;
use crate::storage::StoreResult;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed-attempt, fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Create a policy; at least one attempt is always made
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Run `f` until it succeeds or attempts run out
    ///
    /// Returns the final result and the number of attempts made.
    pub async fn call<F, Fut, R>(&self, mut f: F) -> (StoreResult<R>, u32)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<R>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return (Ok(result), attempt);
                }
                Err(error) => {
                    if attempt >= self.max_attempts {
                        return (Err(error), attempt);
                    }
                    debug!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt, error, self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }
    }

    /// Run one record-level operation and record its outcome
    pub async fn execute_record<F, Fut, R>(&self, key: ReviewKey, f: F) -> OperationResult
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<R>>,
    {
        let (result, attempts) = self.call(f).await;
        let error = match result {
            Ok(_) => None,
            Err(error) => {
                warn!(
                    key = %key,
                    attempts,
                    transient = error.is_transient(),
                    "Operation failed after {} attempts: {}",
                    attempts,
                    error
                );
                Some(error)
            }
        };

        OperationResult {
            key,
            attempts,
            error,
        }
    }
}
