//! Configuration management for hyperdoc
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use hyperdoc::config::Config;
//! use hyperdoc::Resolver;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! let resolver = Resolver::from_config(&config).expect("Failed to build resolver");
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `HYPERDOC__<section>__<key>`
//!
//! Examples:
//! - `HYPERDOC__HTTP__USER_AGENT=crawler/2.0`
//! - `HYPERDOC__HTTP__REQUEST_TIMEOUT_MS=5000`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/hyperdoc.toml`.
//! This can be overridden using the `HYPERDOC_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, HttpSettings};
pub use validation::ValidationError;

use crate::handlers::RegistryError;
use crate::transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Unknown handler: {0}")]
    RegistryError(#[from] RegistryError),

    #[error("Failed to build transport: {0}")]
    TransportError(#[from] TransportError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse an inline TOML document, without file or environment layers
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resolver;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[http]
max_redirects = 3

[content_types]
"application/schema+json" = "json"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.http.max_redirects, 3);
        assert_eq!(config.content_types.len(), 1);
    }

    #[test]
    fn test_validation_catches_unknown_handler() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[content_types]
"application/xml" = "xml"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::UnknownHandler { .. })
        ));
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            r#"
[http]
user_agent = "inline/1.0"

[content_types]
"application/vnd.api+json" = "json"
"text/markdown" = "default"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.user_agent, "inline/1.0");
        assert_eq!(config.content_types.len(), 2);
    }

    #[test]
    fn test_from_toml_str_rejects_bad_syntax() {
        let result = Config::from_toml_str("[http\nuser_agent = 1");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_resolver_from_config_registers_aliases() {
        let config = Config::from_toml_str(
            r#"
[content_types]
"application/schema+json" = "json"
            "#,
        )
        .unwrap();

        let resolver = Resolver::from_config(&config).unwrap();
        let registry = resolver.registry();

        assert!(registry.has_content_type("application/json"));
        assert_eq!(
            registry
                .get_content_type("application/schema+json")
                .unwrap()
                .name(),
            "json"
        );
    }

    #[test]
    fn test_resolver_from_config_rejects_invalid() {
        let mut config = Config::default();
        config.http.connect_timeout_ms = 0;

        let result = Resolver::from_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
