//! Bundle schema validation
//!
//! Runs before any remote call. A bundle that fails here cannot be safely
//! sequenced, so validation failures abort the entire run rather than being
//! skipped per record.

use crate::models::ProjectBundle;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// One structural problem found in a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    DuplicateExternalId { external_id: String },
    UnknownIssueType { external_id: String, label: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::DuplicateExternalId { external_id } => {
                write!(f, "duplicate externalId '{}'", external_id)
            }
            ValidationIssue::UnknownIssueType { external_id, label } => {
                write!(
                    f,
                    "unknown issue type '{}' on record '{}'",
                    label, external_id
                )
            }
        }
    }
}

/// Structural validation failure for one bundle; fatal for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bundle '{project_key}': {}", format_issues(.issues))]
pub struct ValidationError {
    pub project_key: String,
    pub issues: Vec<ValidationIssue>,
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Verify that every external id is unique within the bundle and every
/// issue type label resolves to a canonical type.
pub fn validate_bundle(bundle: &ProjectBundle) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for record in &bundle.issues {
        if !seen.insert(record.external_id.as_str()) {
            issues.push(ValidationIssue::DuplicateExternalId {
                external_id: record.external_id.clone(),
            });
        }

        if record.canonical_type().is_none() {
            issues.push(ValidationIssue::UnknownIssueType {
                external_id: record.external_id.clone(),
                label: record.issue_type.clone(),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            project_key: bundle.key.clone(),
            issues,
        })
    }
}
