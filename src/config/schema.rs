//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the demo server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the demo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Connection-limited passthrough to the upstream SSE demo.
    pub gate: GateConfig,

    /// Generated static site.
    pub site: SiteConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
        }
    }
}

/// Passthrough gate configuration.
///
/// Requests under `inbound_prefix` are forwarded to `upstream` with the
/// prefix replaced by `upstream_prefix`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Upstream base URL (scheme + authority).
    pub upstream: String,

    /// Inbound path prefix handled by the gate.
    pub inbound_prefix: String,

    /// Path prefix substituted for `inbound_prefix` upstream.
    pub upstream_prefix: String,

    /// Maximum concurrently forwarded connections.
    pub max_connections: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            upstream: "https://data-star.dev".to_string(),
            inbound_prefix: "/api/bad-apple".to_string(),
            upstream_prefix: "/examples/bad_apple/updates".to_string(),
            max_connections: 2,
        }
    }
}

/// Static site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the generated site.
    pub dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dir: "_site".to_string(),
        }
    }
}

/// Timeout configuration.
///
/// The gate's upstream stream is long-lived and never gets a request
/// timeout; only connection establishment is bounded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for demo API handlers in seconds.
    pub api_request_secs: u64,

    /// Upstream connection establishment timeout in seconds.
    pub upstream_connect_secs: u64,

    /// Time open streams get to finish after a shutdown signal, in seconds.
    pub shutdown_drain_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            api_request_secs: 30,
            upstream_connect_secs: 10,
            shutdown_drain_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_deployment() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3001");
        assert_eq!(config.gate.max_connections, 2);
        assert_eq!(config.gate.inbound_prefix, "/api/bad-apple");
        assert_eq!(config.site.dir, "_site");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [gate]
            max_connections = 5

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.gate.max_connections, 5);
        assert_eq!(config.gate.upstream, "https://data-star.dev");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.timeouts.api_request_secs, 30);
    }
}
