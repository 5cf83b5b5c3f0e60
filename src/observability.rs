//! Logging setup and resolution counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`)
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Counts how each resolution was satisfied
#[derive(Debug, Default)]
pub struct ResolveMetrics {
    same_document: AtomicU64,
    embedded: AtomicU64,
    fetched: AtomicU64,
}

impl ResolveMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn same_document(&self) {
        self.same_document.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "same_document", "Metric incremented");
    }

    pub fn embedded(&self) {
        self.embedded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "embedded", "Metric incremented");
    }

    pub fn fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "fetched", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            same_document: self.same_document.load(Ordering::Relaxed),
            embedded: self.embedded.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub same_document: u64,
    pub embedded: u64,
    pub fetched: u64,
}
