//! Structured import run reporting
//!
//! Every record's outcome lands here: successful creations as external-id
//! to remote-key mappings, everything else as a skip with a reason. The run
//! itself always completes; this report is how partial failure surfaces to
//! callers and tests instead of log scraping.

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use uuid::Uuid;

/// One successfully created issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueMapping {
    pub project_key: String,
    pub external_id: String,
    pub remote_key: String,
}

/// One record that was not created, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedIssue {
    pub project_key: String,
    pub external_id: String,
    pub summary: String,
    pub reason: SkipReason,
}

/// Why a record was skipped. All of these are per-record recoverable: the
/// run logs them and moves on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The summary has no usable numeric prefix at leaf depth.
    ParentIndeterminate,
    /// No record of the parent type matches the required prefix.
    ParentNotFound { prefix: String },
    /// A parent candidate exists but was not created (its own create call
    /// failed or never happened).
    ParentNotCreated { parent_external_id: String },
    /// The remote create call itself failed.
    CreateFailed { status: Option<u16>, body: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ParentIndeterminate => {
                write!(f, "parent indeterminate (no usable numeric prefix)")
            }
            SkipReason::ParentNotFound { prefix } => {
                write!(f, "parent record not found (prefix {})", prefix)
            }
            SkipReason::ParentNotCreated { parent_external_id } => {
                write!(f, "parent not yet created (externalId {})", parent_external_id)
            }
            SkipReason::CreateFailed { status: Some(status), body } => {
                write!(f, "create failed (status {}): {}", status, body)
            }
            SkipReason::CreateFailed { status: None, body } => {
                write!(f, "create failed: {}", body)
            }
        }
    }
}

/// Outcome of one import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub created: Vec<IssueMapping>,
    pub skipped: Vec<SkippedIssue>,
}

/// CSV-friendly representation of one report row
#[derive(Debug, Serialize)]
struct ReportRowCsv<'a> {
    project_key: &'a str,
    external_id: &'a str,
    remote_key: &'a str,
    status: &'a str,
    reason: String,
}

impl ImportReport {
    /// Start a new, empty report stamped with a fresh run id.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            created: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_created(
        &mut self,
        project_key: impl Into<String>,
        external_id: impl Into<String>,
        remote_key: impl Into<String>,
    ) {
        self.created.push(IssueMapping {
            project_key: project_key.into(),
            external_id: external_id.into(),
            remote_key: remote_key.into(),
        });
    }

    pub fn record_skipped(
        &mut self,
        project_key: impl Into<String>,
        external_id: impl Into<String>,
        summary: impl Into<String>,
        reason: SkipReason,
    ) {
        self.skipped.push(SkippedIssue {
            project_key: project_key.into(),
            external_id: external_id.into(),
            summary: summary.into(),
            reason,
        });
    }

    /// Stamp the completion time.
    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when every record was created.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Remote key assigned to a record in this run, if any.
    pub fn remote_key(&self, external_id: &str) -> Option<&str> {
        self.created
            .iter()
            .find(|mapping| mapping.external_id == external_id)
            .map(|mapping| mapping.remote_key.as_str())
    }

    /// One-line human summary.
    pub fn summary_line(&self) -> String {
        format!(
            "run {}: {} created, {} skipped",
            self.run_id,
            self.created_count(),
            self.skipped_count()
        )
    }

    /// Multi-line human rendering for terminal output.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.summary_line());
        out.push('\n');

        for mapping in &self.created {
            out.push_str(&format!(
                "  [+] {} {} -> {}\n",
                mapping.project_key, mapping.external_id, mapping.remote_key
            ));
        }

        for skip in &self.skipped {
            out.push_str(&format!(
                "  [!] {} {} ({}): {}\n",
                skip.project_key, skip.external_id, skip.summary, skip.reason
            ));
        }

        out
    }

    /// Write the full report as CSV (header + one row per record).
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for mapping in &self.created {
            csv_writer.serialize(ReportRowCsv {
                project_key: &mapping.project_key,
                external_id: &mapping.external_id,
                remote_key: &mapping.remote_key,
                status: "created",
                reason: String::new(),
            })?;
        }

        for skip in &self.skipped {
            csv_writer.serialize(ReportRowCsv {
                project_key: &skip.project_key,
                external_id: &skip.external_id,
                remote_key: "",
                status: "skipped",
                reason: skip.reason.to_string(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for ImportReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ImportReport {
        let mut report = ImportReport::new();
        report.record_created("WEB", "1", "WEB-101");
        report.record_created("WEB", "2", "WEB-102");
        report.record_skipped(
            "WEB",
            "3",
            "1.1.1. C",
            SkipReason::ParentNotCreated {
                parent_external_id: "2".to_string(),
            },
        );
        report.finish();
        report
    }

    #[test]
    fn test_counts_and_lookup() {
        let report = sample_report();
        assert_eq!(report.created_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert!(!report.is_clean());
        assert_eq!(report.remote_key("1"), Some("WEB-101"));
        assert_eq!(report.remote_key("3"), None);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::ParentNotFound {
                prefix: "1.2.".to_string()
            }
            .to_string(),
            "parent record not found (prefix 1.2.)"
        );
        assert_eq!(
            SkipReason::CreateFailed {
                status: Some(400),
                body: "Bad Request".to_string()
            }
            .to_string(),
            "create failed (status 400): Bad Request"
        );
        assert_eq!(
            SkipReason::CreateFailed {
                status: None,
                body: "connection refused".to_string()
            }
            .to_string(),
            "create failed: connection refused"
        );
    }

    #[test]
    fn test_csv_export() {
        let report = sample_report();
        let mut buf = Vec::new();
        report.write_csv(&mut buf).unwrap();

        let csv = String::from_utf8(buf).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("project_key,external_id,remote_key,status,reason")
        );
        assert!(csv.contains("WEB,1,WEB-101,created,"));
        assert!(csv.contains("parent not yet created (externalId 2)"));
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("parent_not_created"));

        let parsed: ImportReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.created, report.created);
        assert_eq!(parsed.skipped, report.skipped);
    }

    #[test]
    fn test_render_text() {
        let report = sample_report();
        let text = report.render_text();
        assert!(text.contains("2 created, 1 skipped"));
        assert!(text.contains("[+] WEB 1 -> WEB-101"));
        assert!(text.contains("[!] WEB 3"));
    }
}
