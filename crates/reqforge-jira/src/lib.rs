//! ReqForge Jira Integration
//!
//! Client library for creating issues in a Jira-compatible tracker.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use client::JiraClient;
pub use error::{Error, Result};
pub use types::*;
