use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::transport::HttpConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpSettings,
    /// Extra content types mapped to a built-in handler name
    #[serde(default)]
    pub content_types: BTreeMap<String, String>,
}

/// HTTP transport settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Headers sent with every request
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_redirects: default_max_redirects(),
            proxy: None,
            default_headers: BTreeMap::new(),
        }
    }
}

fn default_user_agent() -> String {
    HttpConfig::default().user_agent
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

fn default_max_redirects() -> usize {
    10
}

impl From<&HttpSettings> for HttpConfig {
    fn from(settings: &HttpSettings) -> Self {
        Self {
            connect_timeout: Duration::from_millis(settings.connect_timeout_ms),
            request_timeout: Duration::from_millis(settings.request_timeout_ms),
            max_redirects: settings.max_redirects,
            user_agent: settings.user_agent.clone(),
            proxy: settings.proxy.clone(),
            default_headers: settings.default_headers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.http.connect_timeout_ms, 10_000);
        assert_eq!(config.http.request_timeout_ms, 60_000);
        assert_eq!(config.http.max_redirects, 10);
        assert!(config.content_types.is_empty());
    }

    #[test]
    fn test_http_settings_to_transport_config() {
        let settings = HttpSettings {
            request_timeout_ms: 1_500,
            proxy: Some("http://proxy:8080".to_string()),
            ..HttpSettings::default()
        };

        let http = HttpConfig::from(&settings);
        assert_eq!(http.request_timeout, Duration::from_millis(1_500));
        assert_eq!(http.connect_timeout, Duration::from_secs(10));
        assert_eq!(http.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(http.user_agent, HttpConfig::default().user_agent);
    }
}
