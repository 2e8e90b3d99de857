//! Fetch diagnostics.
//!
//! The fetcher reports what it is doing through a [`FetchObserver`] instead of
//! logging directly, so callers decide where the records go.  Two observers
//! ship with the crate:
//!
//! * [`TracingObserver`] forwards every record to [`tracing`].
//! * [`AttemptLog`] does the same and also keeps a per-fetch summary that the
//!   TUI shows underneath the meme.

use tracing::{debug, info, trace, warn};

use crate::error::FetchError;
use crate::source::{Normalized, SourceDescriptor};

/// Receives diagnostic records from a single fetch.
///
/// Every method has a no-op default; implement only what you need.
pub trait FetchObserver {
    /// About to GET `source`.
    fn attempting(&mut self, _source: &SourceDescriptor) {}

    /// A JSON body arrived and is about to be normalized.
    fn body_received(&mut self, _source: &SourceDescriptor, _body: &str) {}

    /// `source` was given up on.
    fn skipped(&mut self, _source: &SourceDescriptor, _error: &FetchError) {}

    /// `source` produced a meme; the fetch stops here.
    fn succeeded(&mut self, _source: &SourceDescriptor, _normalized: &Normalized) {}

    /// Every source was tried and none worked.
    fn exhausted(&mut self, _attempts: usize) {}
}

/// Forwards fetch records to `tracing` as structured events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn attempting(&mut self, source: &SourceDescriptor) {
        info!(url = %source.url, shape = ?source.shape, "trying meme source");
    }

    fn body_received(&mut self, source: &SourceDescriptor, body: &str) {
        trace!(url = %source.url, body, "meme source response");
    }

    fn skipped(&mut self, source: &SourceDescriptor, error: &FetchError) {
        warn!(url = %source.url, %error, "skipping meme source");
    }

    fn succeeded(&mut self, source: &SourceDescriptor, normalized: &Normalized) {
        debug!(
            url = %source.url,
            field = normalized.field,
            image_url = %normalized.meme.image_url,
            "using image field"
        );
        info!(url = %source.url, title = %normalized.meme.title, "fetched meme");
    }

    fn exhausted(&mut self, attempts: usize) {
        warn!(attempts, "all meme sources failed, using placeholder");
    }
}

/// What happened to one source during a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// Produced the meme, taking the image from `field`.
    Used { field: &'static str },
    /// Skipped for `reason`.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub url: String,
    pub status: AttemptStatus,
}

/// Records one line per source tried, and forwards to [`TracingObserver`].
#[derive(Debug, Default, Clone)]
pub struct AttemptLog {
    pub records: Vec<AttemptRecord>,
    tracing: TracingObserver,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_records(self) -> Vec<AttemptRecord> {
        self.records
    }
}

impl FetchObserver for AttemptLog {
    fn attempting(&mut self, source: &SourceDescriptor) {
        self.tracing.attempting(source);
    }

    fn body_received(&mut self, source: &SourceDescriptor, body: &str) {
        self.tracing.body_received(source, body);
    }

    fn skipped(&mut self, source: &SourceDescriptor, error: &FetchError) {
        self.tracing.skipped(source, error);
        self.records.push(AttemptRecord {
            url: source.url.clone(),
            status: AttemptStatus::Skipped {
                reason: error.to_string(),
            },
        });
    }

    fn succeeded(&mut self, source: &SourceDescriptor, normalized: &Normalized) {
        self.tracing.succeeded(source, normalized);
        self.records.push(AttemptRecord {
            url: source.url.clone(),
            status: AttemptStatus::Used {
                field: normalized.field,
            },
        });
    }

    fn exhausted(&mut self, attempts: usize) {
        self.tracing.exhausted(attempts);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
