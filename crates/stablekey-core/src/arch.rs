//! Arch configuration shared by every check.
//!
//! Built once from user input, validated, then handed to analyzers behind an
//! `Arc`. Nothing mutates it after construction.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::keyword::{unstable_form, MASKED_PREFIX, UNSTABLE_PREFIX};

/// Validated arch universes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchConfig {
    all_arches: BTreeSet<String>,
    stable_arches: BTreeSet<String>,
    target_arches: BTreeSet<String>,
    source_arches: BTreeSet<String>,
}

impl ArchConfig {
    /// Build a configuration from raw arch lists.
    ///
    /// Tokens are trimmed and lose any leading `~`. `stable_arches` defaults
    /// to every arch, `source_arches` to the stable set.
    pub fn new<A, S>(
        arches: A,
        stable_arches: Option<S>,
        source_arches: Option<S>,
    ) -> Result<Self, ConfigError>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let all_arches = normalize_set(arches)?;
        if all_arches.is_empty() {
            return Err(ConfigError::EmptyArches);
        }

        let stable_arches = match stable_arches {
            Some(given) => {
                let set = normalize_set(given)?;
                if set.is_empty() {
                    return Err(ConfigError::EmptyStableArches);
                }
                if let Some(unknown) = set.iter().find(|a| !all_arches.contains(*a)) {
                    return Err(ConfigError::UnknownStableArch {
                        arch: unknown.clone(),
                    });
                }
                set
            }
            None => all_arches.clone(),
        };

        let source_arches = match source_arches {
            Some(given) => {
                let set = normalize_set(given)?;
                if set.is_empty() {
                    return Err(ConfigError::EmptySourceArches);
                }
                set
            }
            None => stable_arches.clone(),
        };

        let target_arches = stable_arches.iter().map(|a| unstable_form(a)).collect();

        tracing::debug!(
            arches = all_arches.len(),
            stable = stable_arches.len(),
            source = source_arches.len(),
            "arch config built"
        );

        Ok(Self {
            all_arches,
            stable_arches,
            target_arches,
            source_arches,
        })
    }

    /// Every recognized arch.
    pub fn all_arches(&self) -> &BTreeSet<String> {
        &self.all_arches
    }

    /// Arches checked for lagging or potential stabilization.
    pub fn stable_arches(&self) -> &BTreeSet<String> {
        &self.stable_arches
    }

    /// Stable arches in unstable form (`~arch`).
    pub fn target_arches(&self) -> &BTreeSet<String> {
        &self.target_arches
    }

    /// Reference arches a version must be stable on to be evaluated.
    pub fn source_arches(&self) -> &BTreeSet<String> {
        &self.source_arches
    }

    /// True when any keyword names a bare source arch.
    pub fn matches_source(&self, keywords: &BTreeSet<String>) -> bool {
        keywords.iter().any(|t| self.source_arches.contains(t))
    }
}

fn normalize_set<I>(tokens: I) -> Result<BTreeSet<String>, ConfigError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| normalize_arch(t.as_ref()))
        .collect()
}

fn normalize_arch(token: &str) -> Result<String, ConfigError> {
    let arch = token.trim().trim_start_matches(UNSTABLE_PREFIX);
    if arch.is_empty()
        || arch.starts_with(MASKED_PREFIX)
        || arch.chars().any(char::is_whitespace)
    {
        return Err(ConfigError::InvalidArch {
            token: token.to_string(),
        });
    }
    Ok(arch.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: Option<Vec<&str>> = None;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_cascade() {
        let config = ArchConfig::new(["amd64", "x86"], NONE, NONE).unwrap();
        assert_eq!(config.stable_arches(), &set(&["amd64", "x86"]));
        assert_eq!(config.source_arches(), &set(&["amd64", "x86"]));
        assert_eq!(config.target_arches(), &set(&["~amd64", "~x86"]));
    }

    #[test]
    fn test_tokens_are_normalized() {
        let config = ArchConfig::new([" ~amd64 ", "x86"], Some(vec!["~x86"]), NONE).unwrap();
        assert_eq!(config.all_arches(), &set(&["amd64", "x86"]));
        assert_eq!(config.stable_arches(), &set(&["x86"]));
        assert_eq!(config.target_arches(), &set(&["~x86"]));
    }

    #[test]
    fn test_source_arches_override() {
        let config =
            ArchConfig::new(["amd64", "x86", "arm"], Some(vec!["amd64", "x86"]), Some(vec!["amd64"]))
                .unwrap();
        assert_eq!(config.source_arches(), &set(&["amd64"]));
        assert!(config.matches_source(&set(&["amd64", "~x86"])));
        assert!(!config.matches_source(&set(&["~amd64", "x86"])));
    }

    #[test]
    fn test_empty_arches_rejected() {
        let err = ArchConfig::new(Vec::<&str>::new(), NONE, NONE).unwrap_err();
        assert_eq!(err, ConfigError::EmptyArches);
    }

    #[test]
    fn test_empty_stable_and_source_rejected() {
        let err = ArchConfig::new(["x86"], Some(Vec::<&str>::new()), None).unwrap_err();
        assert_eq!(err, ConfigError::EmptyStableArches);

        let err = ArchConfig::new(["x86"], None, Some(Vec::<&str>::new())).unwrap_err();
        assert_eq!(err, ConfigError::EmptySourceArches);
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        for bad in ["", "~", "-x86", "x 86"] {
            let err = ArchConfig::new(["amd64", bad], NONE, NONE).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidArch { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_unknown_stable_arch_rejected() {
        let err = ArchConfig::new(["x86"], Some(vec!["arm"]), None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownStableArch {
                arch: "arm".to_string()
            }
        );
    }
}
