//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, PORT override)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared by value with each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, parse_config, ConfigError, PORT_ENV};
pub use schema::{
    GateConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServerConfig, SiteConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
