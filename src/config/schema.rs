//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the receiver.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the postback receiver.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single capture endpoint.
    pub endpoint: EndpointConfig,

    /// Daily append-only response log.
    pub persistence: PersistenceConfig,

    /// Request body limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8909").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8909".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Route accepting `POST` postbacks.
    pub path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            path: "/sailthru_postback".to_string(),
        }
    }
}

/// How the zone suffix of a persisted timestamp is chosen.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Always append `zone_label`, whatever the current offset is.
    #[default]
    Fixed,
    /// Append the abbreviation in effect at that instant (e.g. CST or CDT).
    Observed,
}

/// Persistence writer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Write captured envelopes to disk.
    pub enabled: bool,

    /// Directory holding `response_log_<YYYY>_<MM>_<DD>.txt` files.
    pub log_dir: String,

    /// IANA timezone used for file partitioning and timestamps.
    pub timezone: String,

    /// Suffix used when `label_mode` is `fixed`.
    pub zone_label: String,

    pub label_mode: LabelMode,

    /// Upper bound on one append, in milliseconds. Must stay below the
    /// request timeout so a stuck disk never changes the response.
    pub write_timeout_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: "response_logs".to_string(),
            timezone: "America/Chicago".to_string(),
            zone_label: "CST".to_string(),
            label_mode: LabelMode::Fixed,
            write_timeout_ms: 5_000,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes read for a single postback.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
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
