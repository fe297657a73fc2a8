//! Finding records emitted by the checks.
//!
//! Findings are plain values: once emitted they are never updated. The
//! `Display` impls give the one-line text form used by the CLI.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keyword::stable_tokens;
use crate::record::VersionRecord;

/// Every version of a package is unstable for an arch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstableOnly {
    pub category: String,
    pub package: String,
    pub arch: String,
    /// Unstable versions, in feed order.
    pub versions: Vec<String>,
}

impl UnstableOnly {
    pub fn new(unstable: &[&VersionRecord], arch: &str) -> Option<Self> {
        let first = unstable.first()?;
        Some(Self {
            category: first.category.clone(),
            package: first.package.clone(),
            arch: arch.to_string(),
            versions: unstable.iter().map(|r| r.version.clone()).collect(),
        })
    }

    pub fn short_desc(&self) -> String {
        format!(
            "for arch {}, all versions are unstable: [ {} ]",
            self.arch,
            self.versions.join(", ")
        )
    }
}

impl fmt::Display for UnstableOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: arch {}, all unstable: [ {} ]",
            self.category,
            self.package,
            self.arch,
            self.versions.join(", ")
        )
    }
}

/// Slot-scoped fields shared by [`LaggingStable`] and [`PotentialStable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotVersion {
    pub category: String,
    pub package: String,
    pub version: String,
    pub slot: String,
    /// Arch tokens the finding is about, sorted.
    pub keywords: Vec<String>,
    /// This version's own stable arches, sorted.
    pub stable: Vec<String>,
}

impl SlotVersion {
    fn new(pkg: &VersionRecord, keywords: BTreeSet<String>) -> Self {
        Self {
            category: pkg.category.clone(),
            package: pkg.package.clone(),
            version: pkg.version.clone(),
            slot: pkg.slot.clone(),
            keywords: keywords.into_iter().collect(),
            stable: stable_tokens(&pkg.keywords),
        }
    }

    fn stable_desc(&self) -> String {
        format!(
            "slot({}), stabled arch{}: [ {} ]",
            self.slot,
            pluralism(self.stable.len(), "es"),
            self.stable.join(", ")
        )
    }

    fn cpv(&self) -> String {
        format!("{}/{}-{}", self.category, self.package, self.version)
    }
}

/// Unstable keywords for arches that were stable on an older version of the
/// slot and have not been restabilized since.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaggingStable(pub SlotVersion);

impl LaggingStable {
    pub fn new(pkg: &VersionRecord, lagging: BTreeSet<String>) -> Self {
        Self(SlotVersion::new(pkg, lagging))
    }

    pub fn short_desc(&self) -> String {
        format!(
            "{}, lagging: [ {} ]",
            self.0.stable_desc(),
            self.0.keywords.join(", ")
        )
    }
}

impl fmt::Display for LaggingStable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.cpv(), self.short_desc())
    }
}

/// Unstable keywords on target arches that are candidates for stabilization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PotentialStable(pub SlotVersion);

impl PotentialStable {
    pub fn new(pkg: &VersionRecord, potential: BTreeSet<String>) -> Self {
        Self(SlotVersion::new(pkg, potential))
    }

    pub fn short_desc(&self) -> String {
        format!(
            "{}, potential{}: [ {} ]",
            self.0.stable_desc(),
            pluralism(self.0.keywords.len(), "s"),
            self.0.keywords.join(", ")
        )
    }
}

impl fmt::Display for PotentialStable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.cpv(), self.short_desc())
    }
}

/// Any finding a check can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    UnstableOnly(UnstableOnly),
    LaggingStable(LaggingStable),
    PotentialStable(PotentialStable),
}

impl Finding {
    /// Stable name of the finding kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::UnstableOnly(_) => "unstable_only",
            Finding::LaggingStable(_) => "lagging_stable",
            Finding::PotentialStable(_) => "potential_stable",
        }
    }

    /// `category/package` the finding belongs to.
    pub fn package_key(&self) -> String {
        match self {
            Finding::UnstableOnly(f) => format!("{}/{}", f.category, f.package),
            Finding::LaggingStable(LaggingStable(v))
            | Finding::PotentialStable(PotentialStable(v)) => {
                format!("{}/{}", v.category, v.package)
            }
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::UnstableOnly(inner) => fmt::Display::fmt(inner, f),
            Finding::LaggingStable(inner) => fmt::Display::fmt(inner, f),
            Finding::PotentialStable(inner) => fmt::Display::fmt(inner, f),
        }
    }
}

impl From<UnstableOnly> for Finding {
    fn from(f: UnstableOnly) -> Self {
        Finding::UnstableOnly(f)
    }
}

impl From<LaggingStable> for Finding {
    fn from(f: LaggingStable) -> Self {
        Finding::LaggingStable(f)
    }
}

impl From<PotentialStable> for Finding {
    fn from(f: PotentialStable) -> Self {
        Finding::PotentialStable(f)
    }
}

/// Plural suffix unless there is exactly one item.
fn pluralism(count: usize, plural: &'static str) -> &'static str {
    if count == 1 {
        ""
    } else {
        plural
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unstable_only_display() {
        let a = VersionRecord::new("dev-libs", "foo", "1.0", "0", ["~arm"]);
        let b = VersionRecord::new("dev-libs", "foo", "1.1", "0", ["~arm"]);
        let finding = UnstableOnly::new(&[&a, &b], "arm").unwrap();
        assert_eq!(
            finding.to_string(),
            "dev-libs/foo: arch arm, all unstable: [ 1.0, 1.1 ]"
        );
        assert_eq!(
            finding.short_desc(),
            "for arch arm, all versions are unstable: [ 1.0, 1.1 ]"
        );
    }

    #[test]
    fn test_unstable_only_requires_versions() {
        assert!(UnstableOnly::new(&[], "arm").is_none());
    }

    #[test]
    fn test_lagging_stable_display() {
        let pkg = VersionRecord::new("dev-libs", "foo", "2.0", "1", ["amd64", "~x86", "-ppc"]);
        let finding = LaggingStable::new(&pkg, set(&["~x86"]));
        assert_eq!(finding.0.stable, vec!["amd64"]);
        assert_eq!(
            finding.to_string(),
            "dev-libs/foo-2.0: slot(1), stabled arch: [ amd64 ], lagging: [ ~x86 ]"
        );
    }

    #[test]
    fn test_potential_stable_pluralism() {
        let pkg = VersionRecord::new("dev-libs", "foo", "2.0", "0", ["~arm", "~x86"]);
        let finding = PotentialStable::new(&pkg, set(&["~x86", "~arm"]));
        assert_eq!(finding.0.keywords, vec!["~arm", "~x86"]);
        assert_eq!(
            finding.short_desc(),
            "slot(0), stabled arches: [  ], potentials: [ ~arm, ~x86 ]"
        );
    }

    #[test]
    fn test_finding_serde_tag() {
        let pkg = VersionRecord::new("dev-libs", "foo", "2.0", "0", ["x86", "~arm"]);
        let finding = Finding::from(PotentialStable::new(&pkg, set(&["~arm"])));
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["kind"], "potential_stable");
        assert_eq!(json["stable"], serde_json::json!(["x86"]));
        assert_eq!(finding.kind(), "potential_stable");
        assert_eq!(finding.package_key(), "dev-libs/foo");
    }
}
