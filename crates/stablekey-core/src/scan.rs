//! Running checks over many package feeds.
//!
//! Feeds are independent, so they may be scanned concurrently. Each feed
//! buffers into its own reporter and buffers are merged in feed order, which
//! keeps parallel output identical to a sequential scan.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::checks::CheckSet;
use crate::error::{ConfigError, Result, StablekeyError};
use crate::finding::Finding;
use crate::metrics::METRICS;
use crate::obs::{emit_scan_finished, emit_scan_started, FeedSpan};
use crate::record::PackageFeed;
use crate::report::{Reporter, ScanReport, VecReporter};

/// Configuration for a scan batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum number of feeds scanned at once. `1` scans sequentially.
    pub max_concurrent: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// Run every check over one feed into `reporter`.
pub fn scan_feed_into(checks: &CheckSet, feed: &PackageFeed, reporter: &mut dyn Reporter) {
    let _span = FeedSpan::enter(&feed.key());
    checks.feed(feed, reporter);
    METRICS.inc_feeds_scanned(feed.len());
}

/// Run every check over one feed and return its findings.
pub fn scan_feed(checks: &CheckSet, feed: &PackageFeed) -> Vec<Finding> {
    let mut reporter = VecReporter::new();
    scan_feed_into(checks, feed, &mut reporter);
    reporter.into_findings()
}

/// Scan feeds one after another.
pub fn scan_feeds(checks: &CheckSet, feeds: &[PackageFeed]) -> Vec<Finding> {
    let mut reporter = VecReporter::new();
    for feed in feeds {
        scan_feed_into(checks, feed, &mut reporter);
    }
    reporter.into_findings()
}

/// Scan feeds concurrently, at most `config.max_concurrent` at a time.
///
/// Output order matches [`scan_feeds`].
#[instrument(skip_all, fields(feeds = feeds.len(), max_concurrent = config.max_concurrent))]
pub async fn scan_feeds_parallel(
    checks: Arc<CheckSet>,
    feeds: Vec<PackageFeed>,
    config: &ScanConfig,
) -> Result<Vec<Finding>> {
    if config.max_concurrent == 0 {
        return Err(ConfigError::ZeroConcurrency.into());
    }

    let sem = Arc::new(Semaphore::new(config.max_concurrent));
    let mut tasks: Vec<JoinHandle<Result<Vec<Finding>>>> = Vec::with_capacity(feeds.len());

    for feed in feeds {
        let checks = Arc::clone(&checks);
        let sem = Arc::clone(&sem);

        let task = tokio::spawn(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|e| StablekeyError::Task(e.to_string()))?;
            tokio::task::spawn_blocking(move || scan_feed(&checks, &feed))
                .await
                .map_err(|e| StablekeyError::Task(e.to_string()))
        });
        tasks.push(task);
    }

    let mut findings = Vec::new();
    for joined in join_all(tasks).await {
        let per_feed = joined.map_err(|e| StablekeyError::Task(e.to_string()))??;
        findings.extend(per_feed);
    }
    Ok(findings)
}

/// Scan all feeds and wrap the result in a [`ScanReport`].
pub async fn run_scan(
    checks: Arc<CheckSet>,
    feeds: Vec<PackageFeed>,
    config: &ScanConfig,
) -> Result<ScanReport> {
    let names = checks.names();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let feed_count = feeds.len();
    let parallel = config.max_concurrent > 1;
    emit_scan_started(&name_refs, feed_count, parallel);

    let started = Instant::now();
    let findings = if parallel {
        scan_feeds_parallel(Arc::clone(&checks), feeds, config).await?
    } else if config.max_concurrent == 1 {
        scan_feeds(&checks, &feeds)
    } else {
        return Err(ConfigError::ZeroConcurrency.into());
    };

    emit_scan_finished(
        feed_count,
        findings.len(),
        started.elapsed().as_millis() as u64,
    );
    METRICS.flush();

    ScanReport::new(names, feed_count, findings)
}
