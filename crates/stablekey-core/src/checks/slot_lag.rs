//! Slot stabilization lag.
//!
//! Runs in two passes. Pass one indexes the feed by slot and fixes, per slot,
//! the set of arches that were ever stable anywhere in its history. Pass two
//! walks each slot newest to oldest until it reaches a version stable on a
//! source arch; that version alone decides the slot.
//!
//! Versions walked past on the way fold their stable arches into an
//! accumulator, so an arch restabilized by a newer version is never reported
//! as lagging on an older one.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::arch::ArchConfig;
use crate::checks::{Check, CheckKind};
use crate::finding::{LaggingStable, PotentialStable};
use crate::keyword::{unstable_form, unstable_tokens};
use crate::obs::emit_slot_decided;
use crate::record::{PackageFeed, VersionRecord};
use crate::report::Reporter;

/// Pass one output for a single slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotHistory<'a> {
    pub slot: &'a str,
    /// Slot members, oldest first.
    pub versions: Vec<&'a VersionRecord>,
    /// `~arch` for every arch stable anywhere in the slot.
    ///
    /// Computed from every member, including ones the walk never reaches.
    pub potential_stables: BTreeSet<String>,
}

/// Partition versions by slot, in slot order, keeping version order.
pub fn index_slots<'a>(
    versions: &'a [VersionRecord],
    all_arches: &BTreeSet<String>,
) -> Vec<SlotHistory<'a>> {
    let mut by_slot: BTreeMap<&'a str, Vec<&'a VersionRecord>> = BTreeMap::new();
    for record in versions {
        by_slot.entry(record.slot.as_str()).or_default().push(record);
    }

    by_slot
        .into_iter()
        .map(|(slot, members)| {
            let slot_keywords: BTreeSet<&str> = members
                .iter()
                .flat_map(|r| r.keywords.iter().map(String::as_str))
                .collect();
            let potential_stables = all_arches
                .iter()
                .filter(|arch| slot_keywords.contains(arch.as_str()))
                .map(|arch| unstable_form(arch))
                .collect();
            SlotHistory {
                slot,
                versions: members,
                potential_stables,
            }
        })
        .collect()
}

/// Pass two outcome for a single slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotWalk<'a> {
    /// `pkg` is the newest version matching the source arches.
    Decided {
        pkg: &'a VersionRecord,
        /// Arches stable on versions newer than `pkg`.
        newer_stables: BTreeSet<String>,
    },
    /// No version matches the source arches.
    Exhausted,
}

/// Walk a slot newest to oldest and stop at the first source-arch match.
pub fn walk_slot<'a>(history: &SlotHistory<'a>, arches: &ArchConfig) -> SlotWalk<'a> {
    let mut newer_stables = BTreeSet::new();

    for &pkg in history.versions.iter().rev() {
        if arches.matches_source(&pkg.keywords) {
            return SlotWalk::Decided {
                pkg,
                newer_stables,
            };
        }
        newer_stables.extend(
            pkg.keywords
                .iter()
                .filter(|t| arches.all_arches().contains(*t))
                .cloned(),
        );
    }

    SlotWalk::Exhausted
}

/// Keyword sets the deciding version is reported for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotVerdict {
    pub lagging: BTreeSet<String>,
    pub potential: BTreeSet<String>,
}

/// Compute lagging and potential keywords for the deciding version.
pub fn judge(
    pkg: &VersionRecord,
    potential_stables: &BTreeSet<String>,
    newer_stables: &BTreeSet<String>,
    arches: &ArchConfig,
) -> SlotVerdict {
    let restabilized: BTreeSet<String> = newer_stables.iter().map(|a| unstable_form(a)).collect();

    let lagging: BTreeSet<String> = potential_stables
        .intersection(&pkg.keywords)
        .filter(|t| !restabilized.contains(*t))
        .cloned()
        .collect();

    let potential = arches
        .target_arches()
        .intersection(&unstable_tokens(&pkg.keywords))
        .filter(|t| !lagging.contains(*t))
        .cloned()
        .collect();

    SlotVerdict { lagging, potential }
}

/// Reports `LaggingStable` and `PotentialStable` for the deciding version of
/// each slot.
pub struct SlotLagCheck {
    arches: Arc<ArchConfig>,
}

impl SlotLagCheck {
    pub fn new(arches: Arc<ArchConfig>) -> Self {
        Self { arches }
    }

    /// Verdict per decided slot, in slot order.
    pub fn evaluate<'a>(
        &self,
        versions: &'a [VersionRecord],
    ) -> Vec<(&'a VersionRecord, SlotVerdict)> {
        let mut decided = Vec::new();
        for history in index_slots(versions, self.arches.all_arches()) {
            match walk_slot(&history, &self.arches) {
                SlotWalk::Decided { pkg, newer_stables } => {
                    let verdict =
                        judge(pkg, &history.potential_stables, &newer_stables, &self.arches);
                    decided.push((pkg, verdict));
                }
                SlotWalk::Exhausted => {
                    tracing::trace!(slot = history.slot, "no version matches source arches");
                }
            }
        }
        decided
    }
}

impl Check for SlotLagCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::SlotLag
    }

    fn feed(&self, feed: &PackageFeed, reporter: &mut dyn Reporter) {
        for (pkg, verdict) in self.evaluate(&feed.versions) {
            emit_slot_decided(
                &feed.key(),
                &pkg.slot,
                &pkg.version,
                verdict.lagging.len(),
                verdict.potential.len(),
            );
            let SlotVerdict { lagging, potential } = verdict;
            if !lagging.is_empty() {
                reporter.report(LaggingStable::new(pkg, lagging).into());
            }
            if !potential.is_empty() {
                reporter.report(PotentialStable::new(pkg, potential).into());
            }
        }
    }
}
