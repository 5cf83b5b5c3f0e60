use mime::Mime;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::default::DefaultHandler;
use super::json::JsonHandler;
use super::traits::ContentHandler;
use crate::document::{Document, Resolved};
use crate::error::{ResolveError, Result};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("handler not found: {0}")]
    NotFound(String),
}

/// Registry mapping content types to handler instances
///
/// Built up front with `&mut` access and then handed to a
/// [`Resolver`](crate::resolver::Resolver), which freezes it; every
/// registration therefore happens before any resolution starts.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Arc<dyn ContentHandler>>,
    fallback: Arc<dyn ContentHandler>,
}

impl HandlerRegistry {
    /// Empty registry; everything dispatches to [`DefaultHandler`]
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
            fallback: Arc::new(DefaultHandler),
        }
    }

    /// Registry with the built-in handlers registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add_content_type(JsonHandler::CONTENT_TYPE, Arc::new(JsonHandler));
        registry
    }

    /// Look up a built-in handler by name (`"json"`, `"default"`)
    pub fn builtin(name: &str) -> std::result::Result<Arc<dyn ContentHandler>, RegistryError> {
        match name {
            "json" => Ok(Arc::new(JsonHandler)),
            "default" => Ok(Arc::new(DefaultHandler)),
            other => Err(RegistryError::NotFound(other.to_string())),
        }
    }

    /// Register (or replace) the handler for an exact content type
    pub fn add_content_type(
        &mut self,
        content_type: impl Into<String>,
        handler: Arc<dyn ContentHandler>,
    ) {
        self.handlers.insert(content_type.into(), handler);
    }

    pub fn get_content_type(&self, content_type: &str) -> Option<Arc<dyn ContentHandler>> {
        self.handlers.get(content_type).cloned()
    }

    pub fn has_content_type(&self, content_type: &str) -> bool {
        self.handlers.contains_key(content_type)
    }

    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn default_handler(&self) -> Arc<dyn ContentHandler> {
        self.fallback.clone()
    }

    /// Pick the handler responsible for `doc`
    ///
    /// The nil document, bare values and documents without a `content-type`
    /// get the default handler. A `content-type` that does not parse is an
    /// error; parameters are ignored for the lookup.
    pub fn content_type_handler(&self, doc: &Resolved) -> Result<Arc<dyn ContentHandler>> {
        match doc {
            Resolved::Document(doc) => self.document_handler(doc),
            Resolved::Value(_) => Ok(self.default_handler()),
        }
    }

    pub(crate) fn document_handler(&self, doc: &Document) -> Result<Arc<dyn ContentHandler>> {
        if doc.is_nil() {
            return Ok(self.default_handler());
        }

        let Some(raw) = doc.content_type() else {
            return Ok(self.default_handler());
        };

        let media_type: Mime = raw
            .parse()
            .map_err(|source| ResolveError::InvalidContentType {
                value: raw.to_string(),
                source,
            })?;

        Ok(self
            .get_content_type(media_type.essence_str())
            .unwrap_or_else(|| self.default_handler()))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("content_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HeadersMap;
    use serde_json::json;

    struct Named(&'static str);

    impl ContentHandler for Named {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    fn typed(content_type: &str) -> Resolved {
        Document::new(
            "http://a/x",
            [("content-type".to_string(), content_type.to_string())].into(),
            "",
        )
        .into()
    }

    fn registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.add_content_type("text/html", Arc::new(Named("html")));
        registry
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = HandlerRegistry::new();
        assert_eq!(registry.content_types().count(), 0);
        assert!(registry.get_content_type("application/json").is_none());
    }

    #[test]
    fn test_with_defaults_registers_json() {
        let registry = HandlerRegistry::with_defaults();
        assert!(registry.has_content_type("application/json"));
        assert_eq!(
            registry.get_content_type("application/json").unwrap().name(),
            "json"
        );
    }

    #[test]
    fn test_registration_overwrites() {
        let mut registry = registry();
        registry.add_content_type("text/html", Arc::new(Named("other")));

        assert_eq!(registry.get_content_type("text/html").unwrap().name(), "other");
    }

    #[test]
    fn test_dispatch_by_essence() {
        let registry = registry();

        let handler = registry
            .content_type_handler(&typed("text/html; charset=utf-8"))
            .unwrap();
        assert_eq!(handler.name(), "html");

        let handler = registry.content_type_handler(&typed("TEXT/HTML")).unwrap();
        assert_eq!(handler.name(), "html");
    }

    #[test]
    fn test_fallbacks_to_default() {
        let registry = registry();

        let nil = Resolved::Document(Document::nil());
        assert_eq!(registry.content_type_handler(&nil).unwrap().name(), "default");

        let value = Resolved::Value(json!({"url": "http://a/x"}));
        assert_eq!(registry.content_type_handler(&value).unwrap().name(), "default");

        let unregistered = typed("text/plain");
        assert_eq!(
            registry.content_type_handler(&unregistered).unwrap().name(),
            "default"
        );

        let untyped = Document::new("http://a/x", HeadersMap::new(), "").into();
        assert_eq!(registry.content_type_handler(&untyped).unwrap().name(), "default");
    }

    #[test]
    fn test_malformed_content_type_fails() {
        let registry = registry();
        let result = registry.content_type_handler(&typed("not a media type"));

        assert!(matches!(
            result,
            Err(ResolveError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(HandlerRegistry::builtin("json").unwrap().name(), "json");
        assert_eq!(HandlerRegistry::builtin("default").unwrap().name(), "default");
        assert!(matches!(
            HandlerRegistry::builtin("xml"),
            Err(RegistryError::NotFound(_))
        ));
    }
}
