//! Import bundle data model

use crate::models::record::IssueRecord;
use crate::Result;
use serde::{Deserialize, Serialize};

/// One tracker project and its flat, ordered record list.
///
/// Record order is significant: the scheduler iterates in input order and
/// parent tie-breaks resolve to the first match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectBundle {
    pub key: String,
    pub issues: Vec<IssueRecord>,
}

/// Top-level shape of a generated import file: `{"projects": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportFile {
    pub projects: Vec<ProjectBundle>,
}

impl ImportFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total record count across all bundles
    pub fn total_issues(&self) -> usize {
        self.projects.iter().map(|p| p.issues.len()).sum()
    }
}
