//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::http::middleware::AllowListPolicy;
use crate::storage::ClientKind;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Store backend selection.
    pub storage: StorageConfig,

    /// Pipeline behaviour.
    pub gate: GateSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Store backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend family (`key_value` or `list`).
    pub backend: ClientKind,

    /// Store address, e.g. "127.0.0.1:11211".
    ///
    /// Informational only: it is logged at startup, but the stores are
    /// in-process and nothing connects to it.
    pub address: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: ClientKind::KeyValue,
            address: "127.0.0.1:11211".to_string(),
        }
    }
}

/// Maintenance pipeline settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateSettings {
    /// Include the AllowByIP stage.
    pub allow_by_ip: bool,

    /// Behaviour when the allow-list cannot be read.
    pub allow_list_policy: AllowListPolicy,

    /// Resolve the caller from X-Forwarded-For / X-Real-IP.
    pub trust_proxy_headers: bool,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            allow_by_ip: true,
            allow_list_policy: AllowListPolicy::FailOpen,
            trust_proxy_headers: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
