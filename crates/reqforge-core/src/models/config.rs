//! Application configuration

use crate::models::record::IssueType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: String,
    pub jira: JiraConfig,
    pub openai: OpenAiConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JiraConfig {
    /// Base URL of the tracker instance, e.g. `https://your-domain.atlassian.net`
    pub base_url: String,
    /// Account email used for Basic auth together with the API token
    pub email: String,
    /// Default project key for generated bundles
    pub project_key: String,
    /// Issue type names as configured on the tracker instance
    pub type_names: TypeNames,
}

/// Tracker-side names for the three canonical issue types.
///
/// Jira instances localize issue type names; the defaults match a
/// Russian-localized instance, which is what the generation prompts emit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeNames {
    pub epic: String,
    pub story: String,
    pub subtask: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenAiConfig {
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Model used for both generation passes
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportConfig {
    /// Pause between successive create calls, in milliseconds
    pub pacing_ms: u64,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.jira.validate()?;
        self.openai.validate()?;
        self.import.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            jira: JiraConfig::default(),
            openai: OpenAiConfig::default(),
            import: ImportConfig::default(),
        }
    }
}

impl JiraConfig {
    /// Validate tracker configuration
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Validation(
                "Jira base URL must start with http:// or https://".to_string(),
            ));
        }

        if !self.email.contains('@') {
            return Err(Error::Validation(
                "Jira email must be a valid address".to_string(),
            ));
        }

        if self.project_key.trim().is_empty() {
            return Err(Error::Validation(
                "Jira project key cannot be empty".to_string(),
            ));
        }

        self.type_names.validate()?;

        Ok(())
    }
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: "https://your-domain.atlassian.net".to_string(),
            email: "user@example.com".to_string(),
            project_key: "PROJ".to_string(),
            type_names: TypeNames::default(),
        }
    }
}

impl TypeNames {
    /// Validate type name mapping
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("epic", &self.epic),
            ("story", &self.story),
            ("subtask", &self.subtask),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!(
                    "Issue type name for '{}' cannot be empty",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Tracker-side name for a canonical issue type
    pub fn tracker_name(&self, issue_type: IssueType) -> &str {
        match issue_type {
            IssueType::Epic => &self.epic,
            IssueType::Story => &self.story,
            IssueType::Subtask => &self.subtask,
        }
    }
}

impl Default for TypeNames {
    fn default() -> Self {
        Self {
            epic: "Эпик".to_string(),
            story: "История".to_string(),
            subtask: "Подзадача".to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Validate generation configuration
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Validation(
                "OpenAI base URL must start with http:// or https://".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(Error::Validation("Model name cannot be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Validation(
                "Temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
        }
    }
}

impl ImportConfig {
    /// Validate import configuration
    pub fn validate(&self) -> Result<()> {
        // Cap pacing at one minute; anything above is almost certainly a
        // misconfigured unit (seconds instead of milliseconds).
        const MAX_PACING_MS: u64 = 60_000;
        if self.pacing_ms > MAX_PACING_MS {
            return Err(Error::Validation(format!(
                "Pacing delay too long (max {} ms)",
                MAX_PACING_MS
            )));
        }

        Ok(())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { pacing_ms: 300 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0.0");
        assert!(config.validate().is_ok());
        assert_eq!(config.import.pacing_ms, 300);
    }

    #[test]
    fn test_jira_config_validation() {
        let mut config = JiraConfig::default();
        assert!(config.validate().is_ok());

        config.base_url = "your-domain.atlassian.net".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://your-domain.atlassian.net".to_string();
        config.email = "not-an-email".to_string();
        assert!(config.validate().is_err());

        config.email = "user@example.com".to_string();
        config.project_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_type_names_default_localized() {
        let names = TypeNames::default();
        assert_eq!(names.tracker_name(IssueType::Epic), "Эпик");
        assert_eq!(names.tracker_name(IssueType::Story), "История");
        assert_eq!(names.tracker_name(IssueType::Subtask), "Подзадача");
    }

    #[test]
    fn test_type_names_validation() {
        let mut names = TypeNames::default();
        assert!(names.validate().is_ok());

        names.story = "".to_string();
        assert!(names.validate().is_err());
    }

    #[test]
    fn test_openai_config_validation() {
        let mut config = OpenAiConfig::default();
        assert!(config.validate().is_ok());

        config.temperature = 3.0;
        assert!(config.validate().is_err());

        config.temperature = 0.0;
        config.model = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_import_config_validation() {
        let config = ImportConfig { pacing_ms: 120_000 };
        assert!(config.validate().is_err());

        let config = ImportConfig::default();
        assert!(config.validate().is_ok());
    }
}
