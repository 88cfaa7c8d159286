//! Store connection configuration

use super::*;
use crate::storage::Consistency;
use serde::{Deserialize, Serialize};

/// Store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend implementation (`memory`, or `cql` with the `cql` feature)
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Contact point host name
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Contact point port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Cloud region used for request signing
    #[serde(default)]
    pub region: Option<String>,
    /// Access key id used for request signing
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key used for request signing
    #[serde(default, skip_serializing)]
    pub secret_access_key: Option<String>,
    /// Temporary session token paired with the access key
    #[serde(default, skip_serializing)]
    pub session_token: Option<String>,
    /// Connect over TLS
    #[serde(default = "default_tls")]
    pub tls: bool,
    /// PEM file of trusted roots; the system store is used when unset
    #[serde(default)]
    pub ca_cert_path: Option<String>,
    /// Keyspace holding the reviews table
    #[serde(default = "default_keyspace")]
    pub keyspace: String,
    /// Consistency level for every benchmark statement
    #[serde(default)]
    pub consistency: Consistency,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            endpoint: default_endpoint(),
            port: default_port(),
            region: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            tls: default_tls(),
            ca_cert_path: None,
            keyspace: default_keyspace(),
            consistency: Consistency::default(),
        }
    }
}

/// Fault injection for the in-memory backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaultConfig {
    /// Probability in `[0, 1]` that a mutation times out
    #[serde(default)]
    pub failure_rate: f64,
    /// Simulated round trip per statement in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
    /// Failed `USE` attempts before a new keyspace turns active
    #[serde(default)]
    pub activation_polls: u32,
}
