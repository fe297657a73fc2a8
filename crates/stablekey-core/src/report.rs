//! Finding sinks and rendered scan reports.
//!
//! Checks push findings into a [`Reporter`]. [`ScanReport`] is the artifact
//! written for consumers once every feed has been scanned.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::finding::Finding;
use crate::metrics::METRICS;

/// Receives findings as checks emit them.
pub trait Reporter {
    fn report(&mut self, finding: Finding);
}

/// Buffers findings in emission order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VecReporter {
    findings: Vec<Finding>,
}

impl VecReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

impl Reporter for VecReporter {
    fn report(&mut self, finding: Finding) {
        METRICS.inc_findings_emitted();
        tracing::trace!(kind = finding.kind(), package = %finding.package_key(), "finding");
        self.findings.push(finding);
    }
}

pub const SCHEMA_VERSION: &str = "1";

/// Scan results artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    /// Names of the checks that ran, in run order.
    pub checks: Vec<String>,
    pub feeds_scanned: usize,
    pub findings: Vec<Finding>,
    /// SHA-256 hex of the serialized findings; equal inputs give equal digests.
    pub findings_digest: String,
}

impl ScanReport {
    pub fn new(checks: Vec<String>, feeds_scanned: usize, findings: Vec<Finding>) -> Result<Self> {
        let findings_digest = findings_digest(&findings)?;
        Ok(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            checks,
            feeds_scanned,
            findings,
            findings_digest,
        })
    }

    /// One line per finding.
    pub fn render_text(&self) -> String {
        render_text(&self.findings)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

/// Digest of a finding list.
pub fn findings_digest(findings: &[Finding]) -> Result<String> {
    let bytes = serde_json::to_vec(findings)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Render findings as text lines.
pub fn render_text(findings: &[Finding]) -> String {
    let mut out = String::new();
    for finding in findings {
        out.push_str(&finding.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::UnstableOnly;
    use crate::record::VersionRecord;

    fn sample() -> Finding {
        let record = VersionRecord::new("dev-libs", "foo", "1.0", "0", ["~arm"]);
        UnstableOnly::new(&[&record], "arm").unwrap().into()
    }

    #[test]
    fn test_vec_reporter_keeps_order() {
        let mut reporter = VecReporter::new();
        assert!(reporter.is_empty());
        reporter.report(sample());
        reporter.report(sample());
        assert_eq!(reporter.len(), 2);
        assert_eq!(reporter.into_findings()[0], sample());
    }

    #[test]
    fn test_digest_is_stable() {
        let a = ScanReport::new(vec!["unstable-only".to_string()], 1, vec![sample()]).unwrap();
        let b = ScanReport::new(vec!["unstable-only".to_string()], 1, vec![sample()]).unwrap();
        assert_eq!(a.findings_digest, b.findings_digest);
        assert_eq!(a.findings_digest.len(), 64);

        let empty = ScanReport::new(vec![], 0, vec![]).unwrap();
        assert_ne!(a.findings_digest, empty.findings_digest);
    }

    #[test]
    fn test_render_text() {
        let report = ScanReport::new(vec![], 1, vec![sample()]).unwrap();
        assert_eq!(
            report.render_text(),
            "dev-libs/foo: arch arm, all unstable: [ 1.0 ]\n"
        );
        assert_eq!(render_text(&[]), "");
    }

    #[test]
    fn test_report_json_roundtrip() {
        let report = ScanReport::new(vec!["unstable-only".to_string()], 1, vec![sample()]).unwrap();
        let json = report.to_json_pretty().unwrap();
        let parsed: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
