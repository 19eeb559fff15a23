pub mod bundle;
pub mod config;
pub mod record;

pub use bundle::{ImportFile, ProjectBundle};
pub use config::{Config, ImportConfig, JiraConfig, OpenAiConfig, TypeNames};
pub use record::{IssueRecord, IssueType};
