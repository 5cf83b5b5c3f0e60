use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by resolution, dispatch and traversal
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot resolve '{reference}' against '{base}': {source}")]
    InvalidUrl {
        base: String,
        reference: String,
        #[source]
        source: url::ParseError,
    },

    #[error("malformed content-type '{value}': {source}")]
    InvalidContentType {
        value: String,
        #[source]
        source: mime::FromStrError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("handler '{handler}' does not support '{operation}'")]
    MissingCapability {
        handler: &'static str,
        operation: &'static str,
    },

    #[error("expected a sequence, found {0}")]
    NotASequence(&'static str),

    #[error("invalid JSON document at {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
