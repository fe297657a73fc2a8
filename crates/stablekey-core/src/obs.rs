//! Structured observability hooks for scans.
//!
//! Provides a feed-scoped span guard and emitters for the scan lifecycle.
//! Events are emitted at `info!` level; filter with `RUST_LOG`.

use tracing::info;

/// RAII guard that enters a feed-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = FeedSpan::enter("dev-libs/foo");
/// // tracing calls below carry package = "dev-libs/foo"
/// ```
pub struct FeedSpan {
    _span: tracing::span::EnteredSpan,
}

impl FeedSpan {
    /// Create and enter a span tagged with the package key.
    pub fn enter(package: &str) -> Self {
        let span = tracing::debug_span!("stablekey.feed", package = %package);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: scan started.
pub fn emit_scan_started(checks: &[&str], feeds: usize, parallel: bool) {
    info!(
        event = "scan.started",
        checks = %checks.join(","),
        feeds = feeds,
        parallel = parallel,
    );
}

/// Emit event: scan finished.
pub fn emit_scan_finished(feeds: usize, findings: usize, duration_ms: u64) {
    info!(
        event = "scan.finished",
        feeds = feeds,
        findings = findings,
        duration_ms = duration_ms,
    );
}

/// Emit event: a slot was decided on a reference version.
pub fn emit_slot_decided(package: &str, slot: &str, version: &str, lagging: usize, potential: usize) {
    tracing::debug!(
        event = "slot.decided",
        package = %package,
        slot = %slot,
        version = %version,
        lagging = lagging,
        potential = potential,
    );
}
