//! Jira REST API client

use crate::auth::JiraAuth;
use crate::error::{Error, Result};
use crate::types::{
    AdfDocument, CreateIssueRequest, CreatedIssue, IssueFields, IssueTypeRef, Myself, ParentRef,
    ProjectRef,
};

pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    auth: JiraAuth,
}

impl JiraClient {
    pub fn new(base_url: &str, auth: JiraAuth) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Creates one issue and returns its remote key (e.g. "WEB-42").
    ///
    /// Anything other than 201 is returned as [`Error::Api`] with the
    /// response body retained for the caller's report.
    pub async fn create_issue(
        &self,
        project_key: &str,
        summary: &str,
        issue_type_name: &str,
        description: Option<&str>,
        parent_key: Option<&str>,
    ) -> Result<String> {
        let request = CreateIssueRequest {
            fields: IssueFields {
                project: ProjectRef {
                    key: project_key.to_string(),
                },
                summary: summary.to_string(),
                issuetype: IssueTypeRef {
                    name: issue_type_name.to_string(),
                },
                description: AdfDocument::from_text(description.unwrap_or_default()),
                parent: parent_key.map(|key| ParentRef {
                    key: key.to_string(),
                }),
            },
        };

        let response = self
            .http
            .post(format!("{}/rest/api/3/issue", self.base_url))
            .header("Authorization", self.auth.to_basic_auth())
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::CREATED {
            let created: CreatedIssue = response.json().await?;
            Ok(created.key)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Fetches the authenticated user. Used to verify stored credentials.
    pub async fn myself(&self) -> Result<Myself> {
        let response = self
            .http
            .get(format!("{}/rest/api/3/myself", self.base_url))
            .header("Authorization", self.auth.to_basic_auth())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}
