//! stablekey core library
//!
//! Arch keyword stabilization checks over per-package version feeds:
//! - `unstable-only`: arches on which no version of a package is stable
//! - `slot-lag`: slots whose newest reference version lags behind the slot's
//!   stable history, or carries unstable keywords ready for stabilization

pub mod arch;
pub mod checks;
pub mod error;
pub mod feed;
pub mod finding;
pub mod keyword;
pub mod metrics;
pub mod obs;
pub mod record;
pub mod report;
pub mod scan;
pub mod telemetry;

pub use arch::ArchConfig;
pub use checks::slot_lag::{index_slots, judge, walk_slot, SlotHistory, SlotVerdict, SlotWalk};
pub use checks::unstable_only::{arch_status, ArchStatus};
pub use checks::{Check, CheckKind, CheckSet, SlotLagCheck, UnstableOnlyCheck};
pub use error::{ConfigError, FeedError, Result, StablekeyError};
pub use feed::{group_records, FeedDocument};
pub use finding::{Finding, LaggingStable, PotentialStable, SlotVersion, UnstableOnly};
pub use keyword::{classify, stable_tokens, unstable_tokens, KeywordState};
pub use metrics::METRICS;
pub use obs::{emit_scan_finished, emit_scan_started, emit_slot_decided, FeedSpan};
pub use record::{PackageFeed, VersionRecord};
pub use report::{findings_digest, render_text, Reporter, ScanReport, VecReporter};
pub use scan::{run_scan, scan_feed, scan_feeds, scan_feeds_parallel, ScanConfig};
pub use telemetry::init_tracing;

/// stablekey version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
