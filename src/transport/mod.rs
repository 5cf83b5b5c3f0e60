//! Transport collaborators
//!
//! The resolver never talks to the network directly; it asks a
//! [`Transport`] for a response and reads headers and body from it.
//!
//! - [`HttpTransport`] - reqwest-backed HTTP client
//! - [`InMemoryTransport`] - fixed set of resources, for tests and embedding

pub mod http;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::resolver::Options;

pub use http::{HttpConfig, HttpTransport};
pub use memory::InMemoryTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("Failed to read body: {0}")]
    Body(String),
}

/// Fetches a resource by absolute URL
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(
        &self,
        url: &Url,
        options: &Options,
    ) -> Result<Box<dyn TransportResponse>, TransportError>;
}

/// A response whose headers are available and whose body is read on demand
#[async_trait]
pub trait TransportResponse: Send {
    /// Header entries as reported by the transport
    fn headers(&self) -> Vec<(String, String)>;

    /// Read the full body as text
    async fn text(self: Box<Self>) -> Result<String, TransportError>;
}
