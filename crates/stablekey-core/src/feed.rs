//! Feed provider: turns raw version records into per-package feeds.
//!
//! Records are trusted to arrive version-ascending within a package. This
//! module only groups them; it never reorders.

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::record::{PackageFeed, VersionRecord};

/// Accepted shapes of a feed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedDocument {
    /// Already grouped: `{ "packages": [ { category, package, versions } ] }`.
    Grouped { packages: Vec<PackageFeed> },
    /// Flat list of records, packages contiguous.
    Flat(Vec<VersionRecord>),
}

impl FeedDocument {
    /// Parse a JSON feed document.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate and split the document into package feeds.
    pub fn into_feeds(self) -> Result<Vec<PackageFeed>> {
        match self {
            FeedDocument::Flat(records) => group_records(records),
            FeedDocument::Grouped { packages } => {
                let records = packages
                    .into_iter()
                    .flat_map(|feed| {
                        let PackageFeed {
                            category,
                            package,
                            versions,
                        } = feed;
                        versions.into_iter().map(move |mut record| {
                            if record.category.is_empty() {
                                record.category = category.clone();
                            }
                            if record.package.is_empty() {
                                record.package = package.clone();
                            }
                            record
                        })
                    })
                    .collect();
                group_records(records)
            }
        }
    }
}

/// Group contiguous records of the same package into feeds.
///
/// A package that shows up again after another package was started is
/// rejected rather than merged, since merging could break version order.
pub fn group_records(records: Vec<VersionRecord>) -> Result<Vec<PackageFeed>> {
    let mut feeds: Vec<PackageFeed> = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        check_fields(index, &record)?;

        if let Some(current) = feeds.last_mut() {
            if current.category == record.category && current.package == record.package {
                current.versions.push(record);
                continue;
            }
        }

        if feeds
            .iter()
            .any(|f| f.category == record.category && f.package == record.package)
        {
            return Err(FeedError::NonContiguousPackage {
                category: record.category,
                package: record.package,
                index,
            }
            .into());
        }

        feeds.push(PackageFeed {
            category: record.category.clone(),
            package: record.package.clone(),
            versions: vec![record],
        });
    }

    tracing::debug!(feeds = feeds.len(), "records grouped into feeds");
    Ok(feeds)
}

fn check_fields(index: usize, record: &VersionRecord) -> std::result::Result<(), FeedError> {
    let missing = if record.category.is_empty() {
        Some("category")
    } else if record.package.is_empty() {
        Some("package")
    } else if record.version.is_empty() {
        Some("version")
    } else if record.slot.is_empty() {
        Some("slot")
    } else {
        None
    };

    match missing {
        Some(field) => Err(FeedError::MissingField { index, field }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StablekeyError;

    fn rec(pkg: &str, ver: &str) -> VersionRecord {
        VersionRecord::new("dev-libs", pkg, ver, "0", ["x86"])
    }

    #[test]
    fn test_groups_contiguous_records() {
        let feeds = group_records(vec![rec("a", "1"), rec("a", "2"), rec("b", "1")]).unwrap();
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].key(), "dev-libs/a");
        let versions: Vec<&str> = feeds[0].versions.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1", "2"]);
        assert_eq!(feeds[1].len(), 1);
    }

    #[test]
    fn test_same_name_other_category_is_distinct() {
        let other = VersionRecord::new("app-misc", "a", "1", "0", ["x86"]);
        let feeds = group_records(vec![rec("a", "1"), other]).unwrap();
        assert_eq!(feeds.len(), 2);
    }

    #[test]
    fn test_non_contiguous_package_rejected() {
        let err = group_records(vec![rec("a", "1"), rec("b", "1"), rec("a", "2")]).unwrap_err();
        assert!(matches!(
            err,
            StablekeyError::Feed(FeedError::NonContiguousPackage { index: 2, .. })
        ));
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut bad = rec("a", "1");
        bad.slot.clear();
        let err = group_records(vec![bad]).unwrap_err();
        assert!(matches!(
            err,
            StablekeyError::Feed(FeedError::MissingField { field: "slot", .. })
        ));
    }

    #[test]
    fn test_empty_input_yields_no_feeds() {
        assert!(group_records(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_flat_document() {
        let json = r#"[
            {"category":"dev-libs","package":"a","version":"1","keywords":"x86"},
            {"category":"dev-libs","package":"a","version":"2","keywords":"~x86"}
        ]"#;
        let feeds = FeedDocument::from_json(json).unwrap().into_feeds().unwrap();
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].len(), 2);
    }

    #[test]
    fn test_grouped_document_inherits_package() {
        let json = r#"{"packages":[{"category":"dev-libs","package":"a","versions":[
            {"version":"1","slot":"0","keywords":["x86"]}
        ]}]}"#;
        let feeds = FeedDocument::from_json(json).unwrap().into_feeds().unwrap();
        assert_eq!(feeds[0].versions[0].cpv(), "dev-libs/a-1");
    }
}
