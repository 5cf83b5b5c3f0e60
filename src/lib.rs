//! Hypermedia document resolver.
//!
//! Resolves URLs relative to already-fetched documents, dispatches the
//! result on its content type, and exposes a uniform traversal API over
//! JSON, embedded sub-documents and raw text alike.

pub mod config;
pub mod document;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod resolver;
pub mod transport;
pub mod traverse;

pub use document::{Body, Document, DocumentPatch, HeadersMap, Key, Resolved};
pub use error::{ResolveError, Result};
pub use handlers::{ContentHandler, DefaultHandler, HandlerRegistry, JsonHandler};
pub use resolver::{Options, Resolver};
pub use transport::{Transport, TransportError, TransportResponse};
