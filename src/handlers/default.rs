use async_trait::async_trait;
use serde_json::Value;
use std::borrow::Cow;

use super::traits::ContentHandler;
use crate::document::{Document, Key, Resolved};
use crate::error::Result;
use crate::resolver::{Options, Resolver};

/// Fallback handler for unregistered content types and bare values
///
/// `get` is the identity, `value` unwraps a document's body, and `step`
/// indexes whatever value the document's own handler exposes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

#[async_trait]
impl ContentHandler for DefaultHandler {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn get(
        &self,
        doc: Document,
        _options: &Options,
        _resolver: &Resolver,
    ) -> Result<Resolved> {
        Ok(Resolved::Document(doc))
    }

    fn value(&self, doc: &Resolved) -> Result<Value> {
        Ok(match doc {
            Resolved::Document(doc) => doc.body().to_value(),
            Resolved::Value(value) => value.clone(),
        })
    }

    async fn step(
        &self,
        key: &Key,
        doc: Resolved,
        _options: &Options,
        _resolver: &Resolver,
    ) -> Result<Resolved> {
        let current = match &doc {
            Resolved::Document(doc) => doc.body().as_json(),
            Resolved::Value(value) => Cow::Borrowed(value),
        };
        Ok(Resolved::Value(
            key.lookup(&current).cloned().unwrap_or(Value::Null),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HeadersMap;
    use crate::handlers::HandlerRegistry;
    use crate::transport::InMemoryTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn resolver() -> Resolver {
        Resolver::new(HandlerRegistry::new(), Arc::new(InMemoryTransport::new()))
    }

    #[tokio::test]
    async fn test_get_is_identity() {
        let doc = Document::new("http://a/x", HeadersMap::new(), "body");
        let result = DefaultHandler
            .get(doc.clone(), &Options::default(), &resolver())
            .await
            .unwrap();

        assert_eq!(result, Resolved::Document(doc));
    }

    #[test]
    fn test_value_unwraps_documents_only() {
        let doc = Document::new("http://a/x", HeadersMap::new(), json!({"a": 1}));
        assert_eq!(DefaultHandler.value(&doc.into()).unwrap(), json!({"a": 1}));

        let raw = Resolved::Value(json!([1, 2]));
        assert_eq!(DefaultHandler.value(&raw).unwrap(), json!([1, 2]));

        let nil = Resolved::Document(Document::nil());
        assert_eq!(DefaultHandler.value(&nil).unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_step_indexes_value() {
        let resolver = resolver();
        let options = Options::default();
        let doc: Resolved = Document::new(
            "http://a/x",
            HeadersMap::new(),
            json!({"items": ["a", "b"]}),
        )
        .into();

        let items = DefaultHandler
            .step(&Key::from("items"), doc.clone(), &options, &resolver)
            .await
            .unwrap();
        assert_eq!(items, Resolved::Value(json!(["a", "b"])));

        let second = DefaultHandler
            .step(&Key::from(1usize), items, &options, &resolver)
            .await
            .unwrap();
        assert_eq!(second, Resolved::Value(json!("b")));
    }

    #[tokio::test]
    async fn test_step_missing_key_is_null() {
        let resolver = resolver();
        let doc = Resolved::Value(json!({"a": 1}));

        let result = DefaultHandler
            .step(&Key::from("b"), doc, &Options::default(), &resolver)
            .await
            .unwrap();
        assert_eq!(result, Resolved::Value(Value::Null));
    }
}
