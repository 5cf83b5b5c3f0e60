//! HTTP transport for fetching documents

use async_trait::async_trait;
use reqwest::{Client, Proxy, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{Transport, TransportError, TransportResponse};
use crate::document::HeadersMap;
use crate::resolver::Options;

pub type Result<T> = std::result::Result<T, TransportError>;

const USER_AGENT: &str = concat!("hyperdoc/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Sent with every request, before per-call option headers
    pub default_headers: HeadersMap,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_redirects: 10,
            user_agent: USER_AGENT.to_string(),
            proxy: None,
            default_headers: HeadersMap::new(),
        }
    }
}

/// reqwest-backed [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if let Some(url) = &config.proxy {
            let proxy = Proxy::all(url)
                .map_err(|e| TransportError::InvalidUrl(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        url: &Url,
        options: &Options,
    ) -> Result<Box<dyn TransportResponse>> {
        debug!(url = %url, "Fetching document");

        let mut request = self.client.get(url.clone());

        for (name, value) in self.config.default_headers.iter().chain(&options.headers) {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_redirect() {
                TransportError::TooManyRedirects
            } else if e.is_builder() {
                TransportError::InvalidUrl(e.to_string())
            } else {
                TransportError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(url = %url, status = status.as_u16(), "Response received");

        Ok(Box::new(HttpResponse { inner: response }))
    }
}

struct HttpResponse {
    inner: Response,
}

#[async_trait]
impl TransportResponse for HttpResponse {
    fn headers(&self) -> Vec<(String, String)> {
        self.inner
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    async fn text(self: Box<Self>) -> Result<String> {
        let url = self.inner.url().clone();
        let text = self
            .inner
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(url = %url, size = text.len(), "Body read");

        Ok(text)
    }
}
