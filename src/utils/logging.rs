//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level.

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{BenchError, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter for `config`, honouring `RUST_LOG` when set
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
///
/// Fails if a subscriber has already been installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false)
        .with_thread_ids(false);

    let installed = match config.format {
        LogFormat::Text => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| BenchError::config(format!("Failed to initialise logging: {}", e)))
}
