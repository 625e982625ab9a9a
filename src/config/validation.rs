//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and path prefixes
//! - Validate value ranges (timeouts > 0, connection ceiling > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("gate.upstream: {0}")]
    InvalidUpstream(String),

    #[error("{field}: prefix '{value}' must start with '/' and must not end with '/'")]
    InvalidPrefix { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    match Url::parse(&config.gate.upstream) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::InvalidUpstream(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        Ok(url) if url.host_str().is_none() => {
            errors.push(ValidationError::InvalidUpstream("missing host".to_string()));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidUpstream(e.to_string())),
    }

    if !valid_prefix(&config.gate.inbound_prefix, false) {
        errors.push(ValidationError::InvalidPrefix {
            field: "gate.inbound_prefix",
            value: config.gate.inbound_prefix.clone(),
        });
    }
    if !valid_prefix(&config.gate.upstream_prefix, true) {
        errors.push(ValidationError::InvalidPrefix {
            field: "gate.upstream_prefix",
            value: config.gate.upstream_prefix.clone(),
        });
    }

    if config.gate.max_connections == 0 {
        errors.push(ValidationError::Zero("gate.max_connections"));
    }
    if config.timeouts.api_request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.api_request_secs"));
    }
    if config.timeouts.upstream_connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.upstream_connect_secs"));
    }
    if config.timeouts.shutdown_drain_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.shutdown_drain_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn valid_prefix(prefix: &str, allow_root: bool) -> bool {
    if allow_root && prefix == "/" {
        return true;
    }
    prefix.starts_with('/') && !prefix.ends_with('/')
}
