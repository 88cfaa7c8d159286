//! Configuration management for the benchmark
//!
//! Configuration comes from an optional YAML file, then environment
//! variables (including a `.env` file), and is validated before use.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the benchmark
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store connection
    #[serde(default)]
    pub store: StoreConfig,
    /// Bulk engine and run sequencing
    #[serde(default)]
    pub bench: BenchConfig,
    /// Fault injection for the in-memory backend
    #[serde(default)]
    pub faults: FaultConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BenchError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| BenchError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load the file if given, then apply environment overrides
    ///
    /// A `.env` file in the working directory is read first when present.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", env_file);
        }

        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.store
            .validate()
            .map_err(|e| BenchError::Config(format!("Store config error: {}", e)))?;
        self.bench
            .validate()
            .map_err(|e| BenchError::Config(format!("Bench config error: {}", e)))?;
        self.faults
            .validate()
            .map_err(|e| BenchError::Config(format!("Fault config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| BenchError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| BenchError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
