//! Keyword checks and the registry used to select them.
//!
//! Every check implements [`Check`]: it takes one package feed and pushes
//! zero or more findings into a [`Reporter`]. Checks hold only the shared,
//! read-only [`ArchConfig`].

pub mod slot_lag;
pub mod unstable_only;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arch::ArchConfig;
use crate::error::ConfigError;
use crate::record::PackageFeed;
use crate::report::Reporter;

pub use slot_lag::SlotLagCheck;
pub use unstable_only::UnstableOnlyCheck;

/// A check run once per package feed.
pub trait Check: Send + Sync {
    fn kind(&self) -> CheckKind;

    /// Scan one package. Never fails; malformed keywords count as absent.
    fn feed(&self, feed: &PackageFeed, reporter: &mut dyn Reporter);
}

/// Known checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    UnstableOnly,
    SlotLag,
}

impl CheckKind {
    pub const ALL: [CheckKind; 2] = [CheckKind::UnstableOnly, CheckKind::SlotLag];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::UnstableOnly => "unstable-only",
            CheckKind::SlotLag => "slot-lag",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CheckKind::UnstableOnly => "packages whose keywords for an arch are strictly unstable",
            CheckKind::SlotLag => "slots lagging in stabilization or ready for new stables",
        }
    }

    /// Finding kinds this check can emit.
    pub fn findings(self) -> &'static [&'static str] {
        match self {
            CheckKind::UnstableOnly => &["unstable_only"],
            CheckKind::SlotLag => &["lagging_stable", "potential_stable"],
        }
    }

    /// Instantiate the check against a shared arch configuration.
    pub fn build(self, arches: Arc<ArchConfig>) -> Box<dyn Check> {
        match self {
            CheckKind::UnstableOnly => Box::new(UnstableOnlyCheck::new(arches)),
            CheckKind::SlotLag => Box::new(SlotLagCheck::new(arches)),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CheckKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unstable-only" | "unstable_only" => Ok(CheckKind::UnstableOnly),
            "slot-lag" | "slot_lag" | "imlate" => Ok(CheckKind::SlotLag),
            other => Err(ConfigError::UnknownCheck {
                name: other.to_string(),
            }),
        }
    }
}

/// An ordered, deduplicated set of built checks.
pub struct CheckSet {
    checks: Vec<Box<dyn Check>>,
}

impl CheckSet {
    /// Build every requested check once. Duplicates keep their first position.
    pub fn new(kinds: &[CheckKind], arches: Arc<ArchConfig>) -> Self {
        let mut seen = Vec::new();
        let mut checks = Vec::new();
        for kind in kinds {
            if seen.contains(kind) {
                continue;
            }
            seen.push(*kind);
            checks.push(kind.build(Arc::clone(&arches)));
        }
        Self { checks }
    }

    /// Every known check.
    pub fn all(arches: Arc<ArchConfig>) -> Self {
        Self::new(&CheckKind::ALL, arches)
    }

    pub fn kinds(&self) -> Vec<CheckKind> {
        self.checks.iter().map(|c| c.kind()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.checks.iter().map(|c| c.kind().name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check over one feed, in order.
    pub fn feed(&self, feed: &PackageFeed, reporter: &mut dyn Reporter) {
        for check in &self.checks {
            check.feed(feed, reporter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arches() -> Arc<ArchConfig> {
        Arc::new(ArchConfig::new(["x86"], None::<Vec<&str>>, None).unwrap())
    }

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("unstable-only".parse::<CheckKind>().unwrap(), CheckKind::UnstableOnly);
        assert_eq!("imlate".parse::<CheckKind>().unwrap(), CheckKind::SlotLag);
        assert_eq!(" Slot-Lag ".parse::<CheckKind>().unwrap(), CheckKind::SlotLag);
        assert_eq!(
            "bogus".parse::<CheckKind>().unwrap_err(),
            ConfigError::UnknownCheck {
                name: "bogus".to_string()
            }
        );
    }

    #[test]
    fn test_name_roundtrip() {
        for kind in CheckKind::ALL {
            assert_eq!(kind.name().parse::<CheckKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
            assert!(!kind.findings().is_empty());
        }
    }

    #[test]
    fn test_check_set_dedups_in_order() {
        let set = CheckSet::new(
            &[CheckKind::SlotLag, CheckKind::UnstableOnly, CheckKind::SlotLag],
            arches(),
        );
        assert_eq!(set.kinds(), vec![CheckKind::SlotLag, CheckKind::UnstableOnly]);
        assert_eq!(set.names(), vec!["slot-lag", "unstable-only"]);
        assert!(!set.is_empty());
        assert!(CheckSet::new(&[], arches()).is_empty());
    }
}
