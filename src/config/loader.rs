//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the listener port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value '{0}'")]
    Port(String),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides, then re-validate.
///
/// `PORT` replaces the port of `listener.bind_address`, keeping its host.
pub fn apply_env_overrides(
    mut config: ServerConfig,
    port: Option<String>,
) -> Result<ServerConfig, ConfigError> {
    if let Some(port) = port {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Port(port.clone()))?;
        let mut addr: SocketAddr = config.listener.bind_address.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidAddress {
                field: "listener.bind_address",
                value: config.listener.bind_address.clone(),
            }])
        })?;
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
