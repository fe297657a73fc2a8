//! Keyword token classification.
//!
//! A keyword token marks one version's support for one arch: `amd64` is
//! stable, `~amd64` is unstable, `-amd64` is explicitly masked. Masked and
//! missing arches classify the same way.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Prefix marking an unstable keyword.
pub const UNSTABLE_PREFIX: char = '~';

/// Prefix marking an explicitly masked keyword.
pub const MASKED_PREFIX: char = '-';

/// Support state of one version for one arch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordState {
    Stable,
    Unstable,
    Absent,
}

/// Classify the support state of `arch` given a version's keyword tokens.
///
/// `arch` is the bare arch name. A bare token wins over an unstable one if a
/// (malformed) record carries both.
pub fn classify(keywords: &BTreeSet<String>, arch: &str) -> KeywordState {
    if keywords.contains(arch) {
        KeywordState::Stable
    } else if keywords.contains(&unstable_form(arch)) {
        KeywordState::Unstable
    } else {
        KeywordState::Absent
    }
}

/// `~arch` for a bare arch name.
pub fn unstable_form(arch: &str) -> String {
    format!("{UNSTABLE_PREFIX}{arch}")
}

/// Tokens that are neither unstable nor masked, sorted.
pub fn stable_tokens(keywords: &BTreeSet<String>) -> Vec<String> {
    keywords
        .iter()
        .filter(|t| !t.starts_with(UNSTABLE_PREFIX) && !t.starts_with(MASKED_PREFIX))
        .cloned()
        .collect()
}

/// Tokens carrying the unstable prefix.
pub fn unstable_tokens(keywords: &BTreeSet<String>) -> BTreeSet<String> {
    keywords
        .iter()
        .filter(|t| t.starts_with(UNSTABLE_PREFIX))
        .cloned()
        .collect()
}
