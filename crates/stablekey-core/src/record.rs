//! Version records and per-package feeds.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// One version of a package as seen by the checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub package: String,
    /// Full version string including any revision (`1.2.3-r1`).
    pub version: String,
    #[serde(default = "default_slot")]
    pub slot: String,
    /// Raw keyword tokens. Accepts a JSON array or a whitespace separated string.
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: BTreeSet<String>,
}

fn default_slot() -> String {
    "0".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordsRepr {
    List(Vec<String>),
    Line(String),
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tokens = match KeywordsRepr::deserialize(deserializer)? {
        KeywordsRepr::List(list) => list,
        KeywordsRepr::Line(line) => line.split_whitespace().map(str::to_string).collect(),
    };
    Ok(tokens.into_iter().filter(|t| !t.is_empty()).collect())
}

impl VersionRecord {
    /// Build a record from its parts.
    pub fn new<I, T>(category: &str, package: &str, version: &str, slot: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            category: category.to_string(),
            package: package.to_string(),
            version: version.to_string(),
            slot: slot.to_string(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// `category/package`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.category, self.package)
    }

    /// `category/package-version`.
    pub fn cpv(&self) -> String {
        format!("{}/{}-{}", self.category, self.package, self.version)
    }
}

/// Every version of one package, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFeed {
    pub category: String,
    pub package: String,
    pub versions: Vec<VersionRecord>,
}

impl PackageFeed {
    /// `category/package`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.category, self.package)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_from_list() {
        let json = r#"{"category":"dev-libs","package":"foo","version":"1.0","slot":"0","keywords":["x86","~arm","x86"]}"#;
        let record: VersionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.keywords.len(), 2);
        assert!(record.keywords.contains("~arm"));
    }

    #[test]
    fn test_keywords_from_line() {
        let json = r#"{"category":"dev-libs","package":"foo","version":"1.0","keywords":"  amd64 ~x86\t-sparc "}"#;
        let record: VersionRecord = serde_json::from_str(json).unwrap();
        let tokens: Vec<&str> = record.keywords.iter().map(String::as_str).collect();
        assert_eq!(tokens, vec!["-sparc", "amd64", "~x86"]);
        assert_eq!(record.slot, "0");
    }

    #[test]
    fn test_missing_keywords_default_empty() {
        let json = r#"{"category":"dev-libs","package":"foo","version":"1.0","slot":"2"}"#;
        let record: VersionRecord = serde_json::from_str(json).unwrap();
        assert!(record.keywords.is_empty());
        assert_eq!(record.cpv(), "dev-libs/foo-1.0");
    }
}
