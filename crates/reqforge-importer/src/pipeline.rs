//! Document-to-bundle generation pipeline
//!
//! Two chat passes: the first extracts a numbered requirements list from
//! the source document, the second refines that list into the import JSON
//! shape. The refined bundle is snapshotted to disk so imports can be
//! re-run without re-generating.

use reqforge_core::models::ImportFile;
use reqforge_core::storage::BundleStorage;
use reqforge_openai::{prompt, OpenAiClient};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Generation request failed: {0}")]
    Upstream(#[from] reqforge_openai::Error),

    #[error("Generated reply is not valid import JSON: {0}")]
    InvalidJson(reqforge_core::Error),

    #[error("Storage error: {0}")]
    Storage(reqforge_core::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

pub struct GenerationPipeline {
    client: OpenAiClient,
}

impl GenerationPipeline {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    /// First pass: extract the hierarchical requirements list as plain
    /// numbered text.
    pub async fn extract_requirements(&self, document: &str) -> Result<String> {
        let reply = self
            .client
            .chat(prompt::EXTRACTION_SYSTEM, &prompt::extraction_user(document))
            .await?;
        Ok(reply)
    }

    /// Second pass: refine a requirements list into the import file shape.
    ///
    /// Unparsable output is fatal; schema validation of the parsed bundle
    /// happens at import time.
    pub async fn refine_to_import_file(
        &self,
        project_key: &str,
        requirements: &str,
    ) -> Result<ImportFile> {
        let reply = self
            .client
            .chat(
                prompt::REFINEMENT_SYSTEM,
                &prompt::refinement_user(project_key, requirements),
            )
            .await?;

        let cleaned = prompt::strip_code_fences(&reply);
        ImportFile::from_json(&cleaned).map_err(PipelineError::InvalidJson)
    }

    /// Full generation pass: document text in, snapshot saved, bundle out.
    pub async fn generate(
        &self,
        document: &str,
        project_key: &str,
        storage: &BundleStorage,
    ) -> Result<ImportFile> {
        let requirements = self.extract_requirements(document).await?;
        tracing::debug!(chars = requirements.len(), "extracted requirements list");

        let import = self.refine_to_import_file(project_key, &requirements).await?;
        tracing::info!(
            projects = import.projects.len(),
            records = import.total_issues(),
            snapshot = %storage.bundle_path().display(),
            "generated import bundle"
        );

        storage.save(&import).map_err(PipelineError::Storage)?;
        Ok(import)
    }
}
