//! Two-phase creation scheduling
//!
//! Phase 1 creates epics and stories in input order with no parent link;
//! Phase 2 creates subtasks, resolving each parent through the numeric
//! summary prefix against the keys collected in Phase 1. Per-record
//! failures are recorded in the report and the run continues; only schema
//! validation aborts a run, and it does so before any remote call.

use std::sync::Arc;

use reqforge_core::hierarchy;
use reqforge_core::keymap::RunContext;
use reqforge_core::models::{ImportFile, IssueRecord, IssueType, ProjectBundle};
use reqforge_core::report::{ImportReport, SkipReason};
use reqforge_core::validate::{validate_bundle, ValidationError};

use crate::creator::IssueCreator;
use crate::pacer::Pacer;

pub struct ImportScheduler {
    creator: Arc<dyn IssueCreator>,
    pacer: Arc<dyn Pacer>,
}

impl ImportScheduler {
    pub fn new(creator: Arc<dyn IssueCreator>, pacer: Arc<dyn Pacer>) -> Self {
        Self { creator, pacer }
    }

    /// Validates every bundle up front, then processes bundles
    /// independently in file order, each with a fresh [`RunContext`].
    pub async fn run(&self, import: &ImportFile) -> Result<ImportReport, ValidationError> {
        for bundle in &import.projects {
            validate_bundle(bundle)?;
        }

        let mut report = ImportReport::new();
        for bundle in &import.projects {
            self.process_bundle(bundle, &mut report).await;
        }
        report.finish();
        Ok(report)
    }

    async fn process_bundle(&self, bundle: &ProjectBundle, report: &mut ImportReport) {
        tracing::info!(
            project = %bundle.key,
            records = bundle.issues.len(),
            "importing bundle"
        );

        let mut ctx = RunContext::new();

        for record in &bundle.issues {
            if record.canonical_type() == Some(IssueType::Subtask) {
                continue;
            }
            self.create_record(bundle, record, None, &mut ctx, report)
                .await;
            self.pacer.pause().await;
        }

        for record in &bundle.issues {
            if record.canonical_type() != Some(IssueType::Subtask) {
                continue;
            }

            let parent_key = match resolve_parent(bundle, record, &ctx) {
                Ok(key) => key,
                Err(reason) => {
                    tracing::warn!(
                        project = %bundle.key,
                        external_id = %record.external_id,
                        %reason,
                        "skipping subtask"
                    );
                    report.record_skipped(&bundle.key, &record.external_id, &record.summary, reason);
                    continue;
                }
            };

            self.create_record(bundle, record, Some(parent_key.as_str()), &mut ctx, report)
                .await;
            self.pacer.pause().await;
        }
    }

    async fn create_record(
        &self,
        bundle: &ProjectBundle,
        record: &IssueRecord,
        parent_key: Option<&str>,
        ctx: &mut RunContext,
        report: &mut ImportReport,
    ) {
        match self
            .creator
            .create_issue(&bundle.key, record, parent_key)
            .await
        {
            Ok(remote_key) => {
                tracing::info!(
                    project = %bundle.key,
                    external_id = %record.external_id,
                    %remote_key,
                    "created issue"
                );
                ctx.insert(&record.external_id, &remote_key);
                report.record_created(&bundle.key, &record.external_id, remote_key);
            }
            Err(failure) => {
                tracing::warn!(
                    project = %bundle.key,
                    external_id = %record.external_id,
                    %failure,
                    "create failed"
                );
                report.record_skipped(
                    &bundle.key,
                    &record.external_id,
                    &record.summary,
                    SkipReason::CreateFailed {
                        status: failure.status,
                        body: failure.body,
                    },
                );
            }
        }
    }
}

/// Resolve the remote key a subtask must attach to.
///
/// The parent is the first story in input order whose summary starts with
/// the subtask's two-group prefix. The tie-break is deliberate and not
/// configurable.
fn resolve_parent(
    bundle: &ProjectBundle,
    record: &IssueRecord,
    ctx: &RunContext,
) -> Result<String, SkipReason> {
    let Some(prefix) = hierarchy::parent_prefix(&record.summary) else {
        return Err(SkipReason::ParentIndeterminate);
    };

    let parent = bundle.issues.iter().find(|candidate| {
        candidate.canonical_type() == Some(IssueType::Story)
            && candidate.summary.starts_with(&prefix)
    });

    let Some(parent) = parent else {
        return Err(SkipReason::ParentNotFound { prefix });
    };

    match ctx.get(&parent.external_id) {
        Some(key) => Ok(key.to_string()),
        None => Err(SkipReason::ParentNotCreated {
            parent_external_id: parent.external_id.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creator::RemoteFailure;
    use crate::pacer::NoDelay;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct CreateCall {
        external_id: String,
        parent_key: Option<String>,
    }

    /// Creator that hands out sequential keys and records every call.
    /// Failures are keyed by "project:external_id".
    struct MockCreator {
        calls: Mutex<Vec<CreateCall>>,
        fail_on: Vec<String>,
    }

    impl MockCreator {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Vec::new(),
            }
        }

        fn failing_on(keys: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: keys.iter().map(|key| key.to_string()).collect(),
            }
        }

        fn calls(&self) -> Vec<CreateCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IssueCreator for MockCreator {
        async fn create_issue(
            &self,
            project_key: &str,
            record: &IssueRecord,
            parent_key: Option<&str>,
        ) -> Result<String, RemoteFailure> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(CreateCall {
                external_id: record.external_id.clone(),
                parent_key: parent_key.map(str::to_string),
            });

            if self
                .fail_on
                .contains(&format!("{}:{}", project_key, record.external_id))
            {
                return Err(RemoteFailure {
                    status: Some(400),
                    body: "Bad Request".to_string(),
                });
            }
            Ok(format!("{}-{}", project_key, calls.len()))
        }
    }

    fn record(external_id: &str, summary: &str, issue_type: &str) -> IssueRecord {
        IssueRecord {
            external_id: external_id.to_string(),
            summary: summary.to_string(),
            issue_type: issue_type.to_string(),
            description: None,
        }
    }

    fn single_bundle(records: Vec<IssueRecord>) -> ImportFile {
        ImportFile {
            projects: vec![ProjectBundle {
                key: "WEB".to_string(),
                issues: records,
            }],
        }
    }

    fn scheduler(creator: Arc<MockCreator>) -> ImportScheduler {
        ImportScheduler::new(creator, Arc::new(NoDelay))
    }

    #[tokio::test]
    async fn test_three_level_scenario() {
        let creator = Arc::new(MockCreator::new());
        let import = single_bundle(vec![
            record("1", "1. A", "Эпик"),
            record("2", "1.1. B", "История"),
            record("3", "1.1.1. C", "Подзадача"),
        ]);

        let report = scheduler(creator.clone()).run(&import).await.unwrap();

        assert_eq!(report.created_count(), 3);
        assert!(report.is_clean());
        assert_eq!(report.remote_key("1"), Some("WEB-1"));
        assert_eq!(report.remote_key("2"), Some("WEB-2"));
        assert_eq!(report.remote_key("3"), Some("WEB-3"));

        let calls = creator.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].parent_key, None);
        assert_eq!(calls[1].parent_key, None);
        // The subtask attaches to the story created in phase 1.
        assert_eq!(calls[2].external_id, "3");
        assert_eq!(calls[2].parent_key, Some("WEB-2".to_string()));
    }

    #[tokio::test]
    async fn test_validation_failure_means_zero_remote_calls() {
        let creator = Arc::new(MockCreator::new());
        let import = single_bundle(vec![
            record("1", "1. A", "Эпик"),
            record("1", "1.1. B", "История"),
        ]);

        let err = scheduler(creator.clone()).run(&import).await.unwrap_err();
        assert_eq!(err.project_key, "WEB");
        assert!(creator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_any_invalid_bundle_aborts_whole_run() {
        let creator = Arc::new(MockCreator::new());
        let import = ImportFile {
            projects: vec![
                ProjectBundle {
                    key: "OK".to_string(),
                    issues: vec![record("1", "1. A", "Эпик")],
                },
                ProjectBundle {
                    key: "BAD".to_string(),
                    issues: vec![record("1", "1. A", "Feature")],
                },
            ],
        };

        let err = scheduler(creator.clone()).run(&import).await.unwrap_err();
        assert_eq!(err.project_key, "BAD");
        // The valid first bundle must not have started either.
        assert!(creator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_subtasks_created_after_all_non_leaf_records() {
        let creator = Arc::new(MockCreator::new());
        let import = single_bundle(vec![
            record("1", "1. A", "Эпик"),
            record("2", "1.1. B", "История"),
            record("3", "1.1.1. C", "Подзадача"),
            record("4", "2. D", "Эпик"),
            record("5", "2.1. E", "История"),
            record("6", "2.1.1. F", "Подзадача"),
        ]);

        scheduler(creator.clone()).run(&import).await.unwrap();

        let order: Vec<String> = creator
            .calls()
            .iter()
            .map(|call| call.external_id.clone())
            .collect();
        assert_eq!(order, vec!["1", "2", "4", "5", "3", "6"]);
    }

    #[tokio::test]
    async fn test_first_story_wins_prefix_tie() {
        let creator = Arc::new(MockCreator::new());
        let import = single_bundle(vec![
            record("1", "1. A", "Эпик"),
            record("2", "1.2. First", "История"),
            record("3", "1.2. Second", "История"),
            record("4", "1.2.1. Sub", "Подзадача"),
        ]);

        let report = scheduler(creator.clone()).run(&import).await.unwrap();

        let first_story_key = report.remote_key("2").unwrap().to_string();
        let sub_call = creator.calls().into_iter().last().unwrap();
        assert_eq!(sub_call.external_id, "4");
        assert_eq!(sub_call.parent_key, Some(first_story_key));
    }

    #[tokio::test]
    async fn test_failed_story_contains_the_damage() {
        let creator = Arc::new(MockCreator::failing_on(&["WEB:2"]));
        let import = single_bundle(vec![
            record("1", "1. A", "Эпик"),
            record("2", "1.1. B", "История"),
            record("3", "1.1.1. C", "Подзадача"),
            record("4", "2. D", "Эпик"),
            record("5", "2.1. E", "История"),
            record("6", "2.1.1. F", "Подзадача"),
        ]);

        let report = scheduler(creator.clone()).run(&import).await.unwrap();

        // The story itself failed remotely.
        let story_skip = report
            .skipped
            .iter()
            .find(|skip| skip.external_id == "2")
            .unwrap();
        assert_eq!(
            story_skip.reason,
            SkipReason::CreateFailed {
                status: Some(400),
                body: "Bad Request".to_string()
            }
        );

        // Its subtask is skipped without a create attempt.
        let sub_skip = report
            .skipped
            .iter()
            .find(|skip| skip.external_id == "3")
            .unwrap();
        assert_eq!(
            sub_skip.reason,
            SkipReason::ParentNotCreated {
                parent_external_id: "2".to_string()
            }
        );
        assert!(!creator
            .calls()
            .iter()
            .any(|call| call.external_id == "3"));

        // The unrelated branch still completes.
        assert!(report.remote_key("6").is_some());
        assert_eq!(report.created_count(), 4);
        assert_eq!(report.skipped_count(), 2);
    }

    #[tokio::test]
    async fn test_subtask_without_numeric_prefix() {
        let creator = Arc::new(MockCreator::new());
        let import = single_bundle(vec![
            record("1", "1. A", "Эпик"),
            record("2", "Подзадача без номера", "Подзадача"),
        ]);

        let report = scheduler(creator.clone()).run(&import).await.unwrap();

        assert_eq!(report.skipped[0].reason, SkipReason::ParentIndeterminate);
        assert_eq!(creator.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_subtask_with_no_matching_story() {
        let creator = Arc::new(MockCreator::new());
        let import = single_bundle(vec![
            record("1", "1. A", "Эпик"),
            record("2", "1.1. B", "История"),
            record("3", "2.1.1. Orphan", "Подзадача"),
        ]);

        let report = scheduler(creator.clone()).run(&import).await.unwrap();

        assert_eq!(
            report.skipped[0].reason,
            SkipReason::ParentNotFound {
                prefix: "2.1.".to_string()
            }
        );
        assert_eq!(report.created_count(), 2);
    }

    #[tokio::test]
    async fn test_epic_is_never_a_parent_candidate() {
        // A subtask directly under an epic prefix has no story to attach to.
        let creator = Arc::new(MockCreator::new());
        let import = single_bundle(vec![
            record("1", "1.2. A", "Эпик"),
            record("2", "1.2.1. B", "Подзадача"),
        ]);

        let report = scheduler(creator.clone()).run(&import).await.unwrap();

        assert_eq!(
            report.skipped[0].reason,
            SkipReason::ParentNotFound {
                prefix: "1.2.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_bundles_keep_separate_contexts() {
        // Same external id in both bundles; only TWO's story fails. If key
        // mappings leaked across bundles, the subtask in TWO would pick up
        // the key created for ONE instead of being skipped.
        let creator = Arc::new(MockCreator::failing_on(&["TWO:1"]));
        let import = ImportFile {
            projects: vec![
                ProjectBundle {
                    key: "ONE".to_string(),
                    issues: vec![record("1", "1.1. A", "История")],
                },
                ProjectBundle {
                    key: "TWO".to_string(),
                    issues: vec![
                        record("1", "1.1. B", "История"),
                        record("2", "1.1.1. C", "Подзадача"),
                    ],
                },
            ],
        };

        let report = scheduler(creator.clone()).run(&import).await.unwrap();

        assert_eq!(report.created_count(), 1);
        assert_eq!(report.remote_key("1"), Some("ONE-1"));

        let sub_skip = report
            .skipped
            .iter()
            .find(|skip| skip.external_id == "2")
            .unwrap();
        assert_eq!(
            sub_skip.reason,
            SkipReason::ParentNotCreated {
                parent_external_id: "1".to_string()
            }
        );
        assert!(!creator
            .calls()
            .iter()
            .any(|call| call.external_id == "2"));
    }
}
