//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the redirect-following proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, inbound body limits).
    pub listener: ListenerConfig,

    /// Origin and connection pool settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9999").
    pub bind_address: String,

    /// Largest inbound body buffered for replay across redirect hops.
    pub max_body_bytes: usize,

    /// Time allowed for the client to deliver the request body, in seconds.
    pub body_read_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9999".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
            body_read_timeout_secs: 15,
        }
    }
}

/// Origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin host (optionally with port), always reached over HTTPS.
    pub target_host: String,

    /// Timeout applied to each hop independently, in milliseconds.
    pub timeout_ms: u64,

    /// Maximum number of upstream calls per inbound request.
    pub max_redirects: usize,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// TCP keepalive interval in seconds.
    pub keepalive_secs: u64,

    /// Idle pooled connections are closed after this many seconds.
    pub pool_idle_timeout_secs: u64,

    /// Maximum idle pooled connections per host.
    pub pool_max_idle_per_host: usize,
}

impl UpstreamConfig {
    pub fn hop_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target_host: "fingerprints.bablosoft.com".to_string(),
            timeout_ms: 30_000,
            max_redirects: 10,
            connect_timeout_secs: 10,
            keepalive_secs: 30,
            pool_idle_timeout_secs: 90,
            pool_max_idle_per_host: 64,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Timestamps and targets on every log line.
    pub verbose: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verbose: true,
        }
    }
}
