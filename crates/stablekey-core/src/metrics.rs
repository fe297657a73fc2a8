//! Global atomic counters for scan observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a scan).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters, no allocations, no locking.
pub struct Metrics {
    feeds_scanned: AtomicU64,
    versions_scanned: AtomicU64,
    findings_emitted: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            feeds_scanned: AtomicU64::new(0),
            versions_scanned: AtomicU64::new(0),
            findings_emitted: AtomicU64::new(0),
        }
    }

    /// Record one scanned feed holding `versions` records.
    pub fn inc_feeds_scanned(&self, versions: usize) {
        self.feeds_scanned.fetch_add(1, Ordering::Relaxed);
        self.versions_scanned
            .fetch_add(versions as u64, Ordering::Relaxed);
        tracing::trace!(metric = "feeds_scanned", "counter incremented");
    }

    /// Increment the findings-emitted counter by one.
    pub fn inc_findings_emitted(&self) {
        self.findings_emitted.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "findings_emitted", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            feeds_scanned = self.feeds_scanned(),
            versions_scanned = self.versions_scanned(),
            findings_emitted = self.findings_emitted(),
        );
    }

    pub fn feeds_scanned(&self) -> u64 {
        self.feeds_scanned.load(Ordering::Relaxed)
    }

    pub fn versions_scanned(&self) -> u64 {
        self.versions_scanned.load(Ordering::Relaxed)
    }

    pub fn findings_emitted(&self) -> u64 {
        self.findings_emitted.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.feeds_scanned.store(0, Ordering::Relaxed);
        self.versions_scanned.store(0, Ordering::Relaxed);
        self.findings_emitted.store(0, Ordering::Relaxed);
    }
}
