//! Arches a package never reached stable on.
//!
//! For each configured arch, in lexicographic order: a single stable version
//! clears the arch; otherwise every unstable version is reported together.

use std::sync::Arc;

use crate::arch::ArchConfig;
use crate::checks::{Check, CheckKind};
use crate::finding::UnstableOnly;
use crate::keyword::{classify, KeywordState};
use crate::record::{PackageFeed, VersionRecord};
use crate::report::Reporter;

/// How a package stands on one arch across all of its versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchStatus<'a> {
    /// Some version is stable.
    Stable,
    /// No stable version; these versions are unstable, in feed order.
    UnstableOnly(Vec<&'a VersionRecord>),
    /// No version carries the arch at all.
    Unkeyworded,
}

/// Classify a whole feed for one arch. Stops at the first stable version.
pub fn arch_status<'a>(versions: &'a [VersionRecord], arch: &str) -> ArchStatus<'a> {
    let mut unstable = Vec::new();
    for record in versions {
        match classify(&record.keywords, arch) {
            KeywordState::Stable => return ArchStatus::Stable,
            KeywordState::Unstable => unstable.push(record),
            KeywordState::Absent => {}
        }
    }

    if unstable.is_empty() {
        ArchStatus::Unkeyworded
    } else {
        ArchStatus::UnstableOnly(unstable)
    }
}

/// Reports `UnstableOnly` for every configured arch with no stable version.
pub struct UnstableOnlyCheck {
    arches: Arc<ArchConfig>,
}

impl UnstableOnlyCheck {
    pub fn new(arches: Arc<ArchConfig>) -> Self {
        Self { arches }
    }

    /// Findings for one set of versions, without a reporter.
    pub fn evaluate(&self, versions: &[VersionRecord]) -> Vec<UnstableOnly> {
        self.arches
            .all_arches()
            .iter()
            .filter_map(|arch| match arch_status(versions, arch) {
                ArchStatus::UnstableOnly(unstable) => UnstableOnly::new(&unstable, arch),
                ArchStatus::Stable | ArchStatus::Unkeyworded => None,
            })
            .collect()
    }
}

impl Check for UnstableOnlyCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::UnstableOnly
    }

    fn feed(&self, feed: &PackageFeed, reporter: &mut dyn Reporter) {
        for finding in self.evaluate(&feed.versions) {
            tracing::debug!(package = %feed.key(), arch = %finding.arch, "arch is unstable only");
            reporter.report(finding.into());
        }
    }
}
