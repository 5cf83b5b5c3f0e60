//! Immutable document model
//!
//! A [`Document`] is the unit every resolution produces: where it came from,
//! the headers it was served with, and its body. Documents are never mutated;
//! [`Document::extend`] builds a new value from an existing one.

use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::future::{IntoFuture, Ready, ready};
use std::sync::Arc;

use crate::error::Result;

pub type HeadersMap = BTreeMap<String, String>;

/// Sub-resources bundled inside a document, keyed by absolute URI
pub type EmbeddedMap = BTreeMap<String, Value>;

const CONTENT_TYPE: &str = "content-type";

/// Document payload
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    /// No payload (the nil document)
    #[default]
    Empty,
    /// Raw text as read from the transport
    Text(String),
    /// Already-decoded value (embedded payloads, parsed JSON)
    ///
    /// Shared between a document and everything stepped out of it.
    Value(Arc<Value>),
}

impl Body {
    pub fn to_value(&self) -> Value {
        match self {
            Body::Empty => Value::Null,
            Body::Text(text) => Value::String(text.clone()),
            Body::Value(value) => Value::clone(value),
        }
    }

    /// The body as a JSON value, borrowed when already decoded
    pub fn as_json(&self) -> Cow<'_, Value> {
        match self {
            Body::Empty => Cow::Owned(Value::Null),
            Body::Text(text) => Cow::Owned(Value::String(text.clone())),
            Body::Value(value) => Cow::Borrowed(&**value),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Value(Arc::new(value))
    }
}

impl From<Arc<Value>> for Body {
    fn from(value: Arc<Value>) -> Self {
        Body::Value(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    url: String,
    headers: HeadersMap,
    body: Body,
    embedded: Option<Arc<EmbeddedMap>>,
}

impl Document {
    pub fn new(url: impl Into<String>, headers: HeadersMap, body: impl Into<Body>) -> Self {
        Self {
            url: url.into(),
            headers,
            body: body.into(),
            embedded: None,
        }
    }

    /// The "no context" document: empty url, no headers, no body
    pub fn nil() -> Self {
        Self::default()
    }

    /// Attach bundled sub-resources at construction time
    pub fn with_embedded(self, embedded: EmbeddedMap) -> Self {
        Self {
            embedded: Some(Arc::new(embedded)),
            ..self
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeadersMap {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn embedded(&self) -> Option<&EmbeddedMap> {
        self.embedded.as_deref()
    }

    /// Raw `content-type` header, matched case-insensitively
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    pub fn is_nil(&self) -> bool {
        self.url.is_empty()
            && self.headers.is_empty()
            && self.body.is_empty()
            && self.embedded.is_none()
    }

    /// Copy this document, overriding the fields set in `patch`
    pub fn extend(&self, patch: DocumentPatch) -> Self {
        Self {
            url: patch.url.unwrap_or_else(|| self.url.clone()),
            headers: patch.headers.unwrap_or_else(|| self.headers.clone()),
            body: patch.body.unwrap_or_else(|| self.body.clone()),
            embedded: match patch.embedded {
                Some(embedded) => Some(Arc::new(embedded)),
                None => self.embedded.clone(),
            },
        }
    }
}

/// Field overrides for [`Document::extend`]
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    url: Option<String>,
    headers: Option<HeadersMap>,
    body: Option<Body>,
    embedded: Option<EmbeddedMap>,
}

impl DocumentPatch {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn headers(mut self, headers: HeadersMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn embedded(mut self, embedded: EmbeddedMap) -> Self {
        self.embedded = Some(embedded);
        self
    }
}

/// Outcome of a resolution or traversal step
///
/// Either a full [`Document`] (which can be resolved against further) or a
/// bare in-memory value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Document(Document),
    Value(Value),
}

impl Resolved {
    pub fn is_document(&self) -> bool {
        matches!(self, Resolved::Document(_))
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Resolved::Document(doc) => Some(doc),
            Resolved::Value(_) => None,
        }
    }

    pub fn into_document(self) -> Option<Document> {
        match self {
            Resolved::Document(doc) => Some(doc),
            Resolved::Value(_) => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.as_document().is_some_and(Document::is_nil)
    }
}

impl From<Document> for Resolved {
    fn from(doc: Document) -> Self {
        Resolved::Document(doc)
    }
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        Resolved::Value(value)
    }
}

// Lets an already-available document stand wherever a pending one is accepted.
impl IntoFuture for Resolved {
    type Output = Result<Resolved>;
    type IntoFuture = Ready<Result<Resolved>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(Ok(self))
    }
}

impl IntoFuture for Document {
    type Output = Result<Resolved>;
    type IntoFuture = Ready<Result<Resolved>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(Ok(Resolved::Document(self)))
    }
}

/// Index into a composite value: array position or object member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    /// Look the key up in `value`; `None` when absent or not indexable
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match (self, value) {
            (Key::Index(index), Value::Array(items)) => items.get(*index),
            (Key::Name(name), Value::Array(items)) => {
                name.parse::<usize>().ok().and_then(|index| items.get(index))
            }
            (Key::Name(name), Value::Object(members)) => members.get(name),
            (Key::Index(index), Value::Object(members)) => members.get(&index.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{}", index),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}
