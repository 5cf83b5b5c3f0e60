use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

use super::{Transport, TransportError, TransportResponse};
use crate::resolver::Options;

#[derive(Debug, Clone)]
struct StoredResource {
    headers: Vec<(String, String)>,
    body: String,
}

/// Serves a fixed set of resources and records every fetch
///
/// Resources are keyed by URL without fragment, mirroring what an HTTP
/// server would see.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    resources: BTreeMap<String, StoredResource>,
    fetches: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource served with a single `content-type` header
    pub fn with_resource(
        self,
        url: &str,
        content_type: &str,
        body: impl Into<String>,
    ) -> Self {
        self.with_headers(
            url,
            vec![("content-type".to_string(), content_type.to_string())],
            body,
        )
    }

    /// Add a resource with explicit header entries
    pub fn with_headers(
        mut self,
        url: &str,
        headers: Vec<(String, String)>,
        body: impl Into<String>,
    ) -> Self {
        self.resources.insert(
            without_fragment(url).to_string(),
            StoredResource {
                headers,
                body: body.into(),
            },
        );
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// URLs passed to `fetch`, in call order
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|requested| requested.clone())
            .unwrap_or_default()
    }
}

fn without_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(base, _)| base)
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn fetch(
        &self,
        url: &Url,
        _options: &Options,
    ) -> Result<Box<dyn TransportResponse>, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }

        let resource = self
            .resources
            .get(without_fragment(url.as_str()))
            .cloned()
            .ok_or_else(|| TransportError::NotFound(url.to_string()))?;

        Ok(Box::new(resource))
    }
}

#[async_trait]
impl TransportResponse for StoredResource {
    fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }

    async fn text(self: Box<Self>) -> Result<String, TransportError> {
        Ok(self.body)
    }
}
