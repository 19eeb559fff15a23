//! API credential resolution
//!
//! Secrets never live in the config file: the Jira API token comes from
//! the environment or the OS keyring, the OpenAI key from the environment.

use reqforge_jira::auth::JiraAuth;

pub const JIRA_TOKEN_ENV: &str = "JIRA_API_TOKEN";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Jira API token from the environment, if set and non-empty.
pub fn jira_token_env() -> Option<String> {
    std::env::var(JIRA_TOKEN_ENV)
        .ok()
        .filter(|token| !token.is_empty())
}

/// Jira credentials for `email`: environment first, then the OS keyring.
pub fn jira_auth(email: &str) -> reqforge_jira::Result<JiraAuth> {
    match jira_token_env() {
        Some(token) => Ok(JiraAuth::new(email.to_string(), token)),
        None => JiraAuth::from_keyring(email.to_string()),
    }
}

/// OpenAI API key from the environment, if set and non-empty.
pub fn openai_key() -> Option<String> {
    std::env::var(OPENAI_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_token_preferred() {
        unsafe {
            std::env::set_var(JIRA_TOKEN_ENV, "env-token");
        }
        assert_eq!(jira_token_env(), Some("env-token".to_string()));
        assert!(jira_auth("user@example.com").is_ok());
        unsafe {
            std::env::remove_var(JIRA_TOKEN_ENV);
        }
    }

    #[test]
    #[serial]
    fn test_empty_env_token_ignored() {
        unsafe {
            std::env::set_var(JIRA_TOKEN_ENV, "");
        }
        assert_eq!(jira_token_env(), None);
        unsafe {
            std::env::remove_var(JIRA_TOKEN_ENV);
        }
    }

    #[test]
    #[serial]
    fn test_openai_key_from_env() {
        unsafe {
            std::env::set_var(OPENAI_KEY_ENV, "sk-test");
        }
        assert_eq!(openai_key(), Some("sk-test".to_string()));
        unsafe {
            std::env::remove_var(OPENAI_KEY_ENV);
        }
        assert_eq!(openai_key(), None);
    }
}
