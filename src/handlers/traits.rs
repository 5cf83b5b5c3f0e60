use async_trait::async_trait;
use serde_json::Value;

use crate::document::{Document, Key, Resolved};
use crate::error::{ResolveError, Result};
use crate::resolver::{Options, Resolver};

/// Content-type specific behaviour for resolved documents
///
/// Every operation has a default body that fails with
/// [`ResolveError::MissingCapability`], so a handler that only implements
/// part of the contract fails when the missing operation is first used
/// rather than at registration.
///
/// The resolver is passed in so handlers can resolve further references
/// (e.g. following a link while stepping).
#[async_trait]
pub trait ContentHandler: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &'static str;

    /// Post-process a freshly resolved document
    async fn get(
        &self,
        _doc: Document,
        _options: &Options,
        _resolver: &Resolver,
    ) -> Result<Resolved> {
        Err(self.missing("get"))
    }

    /// Extract the in-memory value this handler exposes
    fn value(&self, _doc: &Resolved) -> Result<Value> {
        Err(self.missing("value"))
    }

    /// Index into the document's value
    async fn step(
        &self,
        _key: &Key,
        _doc: Resolved,
        _options: &Options,
        _resolver: &Resolver,
    ) -> Result<Resolved> {
        Err(self.missing("step"))
    }

    #[doc(hidden)]
    fn missing(&self, operation: &'static str) -> ResolveError {
        ResolveError::MissingCapability {
            handler: self.name(),
            operation,
        }
    }
}
