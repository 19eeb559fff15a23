//! Issue creation seam
//!
//! The scheduler drives an [`IssueCreator`] rather than a concrete HTTP
//! client, so tests substitute a recording mock and production wires in
//! [`JiraCreator`].

use async_trait::async_trait;
use reqforge_core::models::{IssueRecord, TypeNames};
use reqforge_jira::JiraClient;
use thiserror::Error;

/// One failed remote create.
///
/// `status` is absent when the failure happened before an HTTP response
/// arrived (transport errors, missing credentials, bad records).
#[derive(Debug, Clone, Error)]
#[error("Remote create failed{}: {body}", format_status(.status))]
pub struct RemoteFailure {
    pub status: Option<u16>,
    pub body: String,
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

/// Remote side of the import: create one issue, return its remote key.
///
/// Implementations must treat every failure as recoverable; the scheduler
/// logs it, records the skip, and moves on.
#[async_trait]
pub trait IssueCreator: Send + Sync {
    async fn create_issue(
        &self,
        project_key: &str,
        record: &IssueRecord,
        parent_key: Option<&str>,
    ) -> Result<String, RemoteFailure>;
}

/// Production creator backed by the Jira REST client.
pub struct JiraCreator {
    client: JiraClient,
    type_names: TypeNames,
}

impl JiraCreator {
    pub fn new(client: JiraClient, type_names: TypeNames) -> Self {
        Self { client, type_names }
    }
}

#[async_trait]
impl IssueCreator for JiraCreator {
    async fn create_issue(
        &self,
        project_key: &str,
        record: &IssueRecord,
        parent_key: Option<&str>,
    ) -> Result<String, RemoteFailure> {
        let Some(issue_type) = record.canonical_type() else {
            return Err(RemoteFailure {
                status: None,
                body: format!("unrecognized issue type '{}'", record.issue_type),
            });
        };

        self.client
            .create_issue(
                project_key,
                &record.summary,
                self.type_names.tracker_name(issue_type),
                record.description.as_deref(),
                parent_key,
            )
            .await
            .map_err(RemoteFailure::from)
    }
}

impl From<reqforge_jira::Error> for RemoteFailure {
    fn from(err: reqforge_jira::Error) -> Self {
        match err {
            reqforge_jira::Error::Api { status, body } => Self {
                status: Some(status),
                body,
            },
            other => Self {
                status: None,
                body: other.to_string(),
            },
        }
    }
}
