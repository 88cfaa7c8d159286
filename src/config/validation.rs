//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.

use super::models::*;
use tracing::warn;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("port must be > 0".to_string());
        }
        if self.keyspace.is_empty()
            || !self
                .keyspace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(format!(
                "keyspace '{}' must be a non-empty identifier of letters, digits and '_'",
                self.keyspace
            ));
        }
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(
                "access_key_id and secret_access_key must be set together".to_string(),
            );
        }
        if self.access_key_id.is_some() && self.region.is_none() {
            return Err("region is required when credentials are set".to_string());
        }
        if self.session_token.is_some() && self.access_key_id.is_none() {
            return Err("session_token requires access_key_id".to_string());
        }
        if !matches!(self.backend.as_str(), "memory" | "cql") {
            return Err(format!(
                "backend must be 'memory' or 'cql', got '{}'",
                self.backend
            ));
        }
        Ok(())
    }
}

impl Validate for BenchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be > 0".to_string());
        }
        if self.max_workers == 0 {
            return Err("max_workers must be > 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be > 0".to_string());
        }
        if self.keyspace_poll_attempts == 0 {
            return Err("keyspace_poll_attempts must be > 0".to_string());
        }
        if !self.boost.is_finite() {
            return Err("boost must be a finite number".to_string());
        }
        if self.dataset.trim().is_empty() {
            return Err("dataset must not be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for FaultConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(format!(
                "failure_rate must be within [0, 1], got {}",
                self.failure_rate
            ));
        }
        if self.failure_rate >= 1.0 {
            warn!("failure_rate is 1.0; every mutation will fail");
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}
