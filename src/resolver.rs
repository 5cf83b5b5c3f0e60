//! Resolution engine
//!
//! [`Resolver::get`] resolves a reference against a context document and
//! decides between three outcomes:
//!
//! 1. the reference names the context document itself (no I/O),
//! 2. the reference names a sub-resource embedded in the context (no I/O),
//! 3. anything else is fetched through the [`Transport`].
//!
//! The result is then handed to the handler registered for its content type.

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::btree_map::Entry;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::{Config, ConfigError};
use crate::document::{Body, Document, DocumentPatch, HeadersMap, Key, Resolved};
use crate::error::{ResolveError, Result};
use crate::handlers::{ContentHandler, HandlerRegistry};
use crate::observability::ResolveMetrics;
use crate::transport::{HttpConfig, HttpTransport, Transport};

/// Per-call options, passed through to the transport and to handlers
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Extra request headers
    pub headers: HeadersMap,
    /// Overrides the transport's request timeout
    pub timeout: Option<Duration>,
    /// Handler-specific settings
    pub params: Map<String, Value>,
}

#[derive(Clone)]
pub struct Resolver {
    registry: Arc<HandlerRegistry>,
    transport: Arc<dyn Transport>,
    metrics: Arc<ResolveMetrics>,
}

impl Resolver {
    pub fn new(registry: HandlerRegistry, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry: Arc::new(registry),
            transport,
            metrics: Arc::new(ResolveMetrics::new()),
        }
    }

    /// Build an HTTP-backed resolver from configuration
    ///
    /// The registry starts from [`HandlerRegistry::with_defaults`] plus the
    /// configured content type aliases.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let transport = HttpTransport::new(HttpConfig::from(&config.http))?;

        let mut registry = HandlerRegistry::with_defaults();
        for (content_type, handler) in &config.content_types {
            registry.add_content_type(content_type.clone(), HandlerRegistry::builtin(handler)?);
        }

        Ok(Self::new(registry, Arc::new(transport)))
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &ResolveMetrics {
        &self.metrics
    }

    pub fn content_type_handler(&self, doc: &Resolved) -> Result<Arc<dyn ContentHandler>> {
        self.registry.content_type_handler(doc)
    }

    /// Resolve `url` relative to `context` and post-process the result
    ///
    /// `context` may be a document, a resolved value, or a pending
    /// resolution; it is awaited first. A bare value as context behaves like
    /// the nil document.
    pub async fn get<C>(&self, url: &str, context: C, options: &Options) -> Result<Resolved>
    where
        C: IntoFuture<Output = Result<Resolved>>,
    {
        let doc = match context.await? {
            Resolved::Document(doc) => doc,
            Resolved::Value(_) => Document::nil(),
        };

        let resolved_url = resolve_url(doc.url(), url)?;
        let reference = uri_reference(resolved_url.as_str());

        let result = if reference == uri_reference(doc.url()) {
            debug!(url = %resolved_url, "Resolved within current document");
            self.metrics.same_document();
            doc.extend(DocumentPatch::default().url(resolved_url.as_str()))
        } else if let Some(payload) = doc.embedded().and_then(|embedded| embedded.get(&reference)) {
            debug!(url = %resolved_url, "Resolved from embedded document");
            self.metrics.embedded();

            let mut headers = HeadersMap::new();
            if let Some(content_type) = doc.content_type() {
                headers.insert("content-type".to_string(), content_type.to_string());
            }
            Document::new(resolved_url.as_str(), headers, payload.clone())
        } else {
            let response = self.transport.fetch(&resolved_url, options).await?;
            self.metrics.fetched();
            let headers = collect_headers(response.headers());
            let body = response.text().await?;

            debug!(url = %resolved_url, headers = headers.len(), "Fetched document");
            Document::new(resolved_url.as_str(), headers, Body::Text(body))
        };

        let handler = self.registry.document_handler(&result)?;
        handler.get(result, options, self).await
    }

    /// Index into `doc` by `key` using its handler's semantics
    pub async fn step<D>(&self, key: impl Into<Key>, doc: D, options: &Options) -> Result<Resolved>
    where
        D: IntoFuture<Output = Result<Resolved>>,
    {
        let key = key.into();
        let doc = doc.await?;
        let handler = self.content_type_handler(&doc)?;
        handler.step(&key, doc, options, self).await
    }

    /// The in-memory value `doc`'s handler exposes
    pub fn value(&self, doc: &Resolved) -> Result<Value> {
        self.content_type_handler(doc)?.value(doc)
    }

    /// The raw body of a document, `None` for bare values
    pub fn source(doc: &Resolved) -> Option<&Body> {
        doc.as_document().map(Document::body)
    }

    /// Step into every element of an array-valued `doc`
    ///
    /// This is the sequence the [`traverse`](crate::traverse) combinators
    /// operate on when walking documents.
    pub async fn items<D>(&self, doc: D, options: &Options) -> Result<Vec<Resolved>>
    where
        D: IntoFuture<Output = Result<Resolved>>,
    {
        let doc = doc.await?;
        // bare values always step through the default handler
        if let Resolved::Value(Value::Array(values)) = doc {
            return Ok(values.into_iter().map(Resolved::Value).collect());
        }

        let length = match self.value(&doc)? {
            Value::Array(items) => items.len(),
            other => return Err(ResolveError::NotASequence(kind(&other))),
        };

        let mut items = Vec::with_capacity(length);
        for index in 0..length {
            items.push(self.step(index, doc.clone(), options).await?);
        }
        Ok(items)
    }

    /// `get` with the reference and options fixed, awaiting only the context
    pub fn getter<'a>(
        &'a self,
        url: &'a str,
        options: &'a Options,
    ) -> impl Fn(Resolved) -> BoxFuture<'a, Result<Resolved>> + Send + Sync + 'a {
        move |doc: Resolved| -> BoxFuture<'a, Result<Resolved>> {
            Box::pin(self.get(url, doc, options))
        }
    }

    /// `step` with the key and options fixed, awaiting only the document
    pub fn stepper<'a>(
        &'a self,
        key: impl Into<Key>,
        options: &'a Options,
    ) -> impl Fn(Resolved) -> BoxFuture<'a, Result<Resolved>> + Send + Sync + 'a {
        let key = key.into();
        move |doc: Resolved| -> BoxFuture<'a, Result<Resolved>> {
            Box::pin(self.step(key.clone(), doc, options))
        }
    }
}

/// Resolve a reference against a base URL; an empty base only accepts
/// absolute references
fn resolve_url(base: &str, reference: &str) -> Result<Url> {
    let resolved = if base.is_empty() {
        Url::parse(reference)
    } else {
        Url::parse(base).and_then(|base| base.join(reference))
    };

    resolved.map_err(|source| ResolveError::InvalidUrl {
        base: base.to_string(),
        reference: reference.to_string(),
        source,
    })
}

/// Fold response header entries into a map, joining repeated names with
/// `", "` in arrival order
fn collect_headers(entries: Vec<(String, String)>) -> HeadersMap {
    let mut headers = HeadersMap::new();
    for (name, value) in entries {
        match headers.entry(name.to_ascii_lowercase()) {
            Entry::Occupied(mut joined) => {
                let joined = joined.get_mut();
                joined.push_str(", ");
                joined.push_str(&value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
    headers
}

/// Canonical form used to compare document identity: the normalized URL
/// without its fragment
fn uri_reference(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.into()
        }
        Err(_) => url.split_once('#').map_or(url, |(base, _)| base).to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
