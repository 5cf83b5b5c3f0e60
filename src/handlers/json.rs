use async_trait::async_trait;
use serde_json::Value;
use std::borrow::Cow;

use super::traits::ContentHandler;
use crate::document::{Body, Document, DocumentPatch, Key, Resolved};
use crate::error::{ResolveError, Result};
use crate::resolver::{Options, Resolver};

/// Handler for `application/json` documents
///
/// The body is decoded once in `get`. The URL fragment is a JSON Pointer
/// selecting the current position inside the document, so stepping keeps a
/// document (and therefore a base URL) rather than a bare value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHandler;

impl JsonHandler {
    pub const CONTENT_TYPE: &'static str = "application/json";
}

#[async_trait]
impl ContentHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn get(
        &self,
        doc: Document,
        _options: &Options,
        _resolver: &Resolver,
    ) -> Result<Resolved> {
        if matches!(doc.body(), Body::Value(_)) {
            return Ok(Resolved::Document(doc));
        }

        let decoded = decode(&doc)?.into_owned();
        Ok(Resolved::Document(
            doc.extend(DocumentPatch::default().body(decoded)),
        ))
    }

    fn value(&self, doc: &Resolved) -> Result<Value> {
        match doc {
            Resolved::Document(doc) => Ok(select(doc)?.unwrap_or(Value::Null)),
            Resolved::Value(value) => Ok(value.clone()),
        }
    }

    async fn step(
        &self,
        key: &Key,
        doc: Resolved,
        _options: &Options,
        _resolver: &Resolver,
    ) -> Result<Resolved> {
        match doc {
            Resolved::Document(doc) => {
                let root = decode(&doc)?;
                let found = root
                    .pointer(&pointer(doc.url()))
                    .and_then(|current| key.lookup(current))
                    .is_some();
                if !found {
                    return Ok(Resolved::Value(Value::Null));
                }

                // the body is shared, only the fragment moves
                let url = append_segment(doc.url(), key);
                Ok(Resolved::Document(doc.extend(DocumentPatch::default().url(url))))
            }
            Resolved::Value(value) => Ok(Resolved::Value(
                key.lookup(&value).cloned().unwrap_or(Value::Null),
            )),
        }
    }
}

/// The decoded root, borrowed from the document when already parsed
fn decode(doc: &Document) -> Result<Cow<'_, Value>> {
    match doc.body() {
        Body::Text(text) => serde_json::from_str(text)
            .map(Cow::Owned)
            .map_err(|source| ResolveError::Json {
                url: doc.url().to_string(),
                source,
            }),
        body => Ok(body.as_json()),
    }
}

/// Clone of the value the fragment points at; `None` when dangling
fn select(doc: &Document) -> Result<Option<Value>> {
    let root = decode(doc)?;
    Ok(root.pointer(&pointer(doc.url())).cloned())
}

fn fragment(url: &str) -> &str {
    url.split_once('#').map_or("", |(_, fragment)| fragment)
}

/// Percent-decoded URL fragment, used as a JSON Pointer
fn pointer(url: &str) -> String {
    let raw = fragment(url);
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

fn append_segment(url: &str, key: &Key) -> String {
    let base = url.split_once('#').map_or(url, |(base, _)| base);
    let segment = key.to_string().replace('~', "~0").replace('/', "~1");
    format!("{}#{}/{}", base, fragment(url), urlencoding::encode(&segment))
}
