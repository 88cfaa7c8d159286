//! Configuration loading utilities
//!
//! Environment variables override values read from the configuration file.

use super::Config;
use super::models::LogFormat;
use crate::utils::error::{BenchError, Result};
use std::str::FromStr;
use tracing::debug;

impl Config {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Applying configuration overrides from environment");

        // Store connection
        if let Some(backend) = lookup("BENCH_BACKEND") {
            self.store.backend = backend;
        }
        if let Some(endpoint) = lookup("KEYSPACES_ENDPOINT") {
            self.store.endpoint = endpoint;
        }
        if let Some(port) = parse_var(&lookup, "KEYSPACES_PORT")? {
            self.store.port = port;
        }
        if let Some(keyspace) = lookup("KEYSPACES_KEYSPACE") {
            self.store.keyspace = keyspace;
        }
        if let Some(region) = lookup("AWS_REGION") {
            self.store.region = Some(region);
        }
        if let Some(key_id) = lookup("AWS_ACCESS_KEY_ID") {
            self.store.access_key_id = Some(key_id);
        }
        if let Some(secret) = lookup("AWS_SECRET_ACCESS_KEY") {
            self.store.secret_access_key = Some(secret);
        }
        if let Some(token) = lookup("AWS_SESSION_TOKEN") {
            self.store.session_token = Some(token);
        }
        if let Some(tls) = parse_var(&lookup, "KEYSPACES_TLS")? {
            self.store.tls = tls;
        }
        if let Some(path) = lookup("KEYSPACES_CA_CERT") {
            self.store.ca_cert_path = Some(path);
        }

        // Bulk engine
        if let Some(batch_size) = parse_var(&lookup, "BENCH_BATCH_SIZE")? {
            self.bench.batch_size = batch_size;
        }
        if let Some(max_workers) = parse_var(&lookup, "BENCH_MAX_WORKERS")? {
            self.bench.max_workers = max_workers;
        }
        if let Some(max_attempts) = parse_var(&lookup, "BENCH_MAX_ATTEMPTS")? {
            self.bench.max_attempts = max_attempts;
        }
        if let Some(pause) = parse_var(&lookup, "BENCH_PHASE_PAUSE_MS")? {
            self.bench.phase_pause_ms = pause;
        }
        if let Some(dataset) = lookup("BENCH_DATASET") {
            self.bench.dataset = dataset;
        }

        // Fault injection
        if let Some(rate) = parse_var(&lookup, "BENCH_FAILURE_RATE")? {
            self.faults.failure_rate = rate;
        }
        if let Some(latency) = parse_var(&lookup, "BENCH_LATENCY_MS")? {
            self.faults.latency_ms = latency;
        }

        // Logging
        if let Some(level) = lookup("BENCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("BENCH_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => {
                    return Err(BenchError::config(format!(
                        "Invalid BENCH_LOG_FORMAT: {}",
                        other
                    )));
                }
            };
        }

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| BenchError::config(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}
