use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;
use tracing::debug;

const PATH_VAR: &str = "HYPERDOC_CONFIG";
const DEFAULT_PATH: &str = "config/hyperdoc.toml";
const ENV_PREFIX: &str = "HYPERDOC";
const ENV_SEPARATOR: &str = "__";

/// Resolver settings from the file named by `HYPERDOC_CONFIG` (or
/// `config/hyperdoc.toml`), with `.env` and process environment on top
pub fn load() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    load_from_sources(config_path())
}

fn config_path() -> PathBuf {
    env::var_os(PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH))
}

/// Layer `path` (optional) under `HYPERDOC__*` variables
///
/// `HYPERDOC__HTTP__REQUEST_TIMEOUT_MS=5000` sets `http.request_timeout_ms`.
pub fn load_from_sources(path: PathBuf) -> Result<Config, ConfigError> {
    if path.is_file() {
        debug!(path = %path.display(), "Reading resolver configuration");
    } else {
        debug!(path = %path.display(), "No configuration file, using defaults");
    }

    config::Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.http.max_redirects, 10);
        assert!(config.content_types.is_empty());
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[http]
user_agent = "crawler/2.0"
request_timeout_ms = 5000

[http.default_headers]
accept = "application/json"

[content_types]
"application/schema+json" = "json"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.http.user_agent, "crawler/2.0");
        assert_eq!(config.http.request_timeout_ms, 5000);
        assert_eq!(config.http.connect_timeout_ms, 10_000);
        assert_eq!(
            config.http.default_headers.get("accept").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            config.content_types.get("application/schema+json").map(String::as_str),
            Some("json")
        );
    }

    // Environment overrides are not exercised here: mutating process env is
    // unsafe with parallel tests.
}
