//! Jira authentication

use crate::error::{Error, Result};

const KEYRING_SERVICE: &str = "reqforge-jira";

pub struct JiraAuth {
    email: String,
    api_token: String,
}

impl JiraAuth {
    pub fn new(email: String, api_token: String) -> Self {
        Self { email, api_token }
    }

    /// Resolves the API token for `email` from the OS keyring.
    pub fn from_keyring(email: String) -> Result<Self> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, &email)?;
        match entry.get_password() {
            Ok(api_token) => Ok(Self { email, api_token }),
            Err(keyring::Error::NoEntry) => Err(Error::Auth(format!(
                "no stored API token for {email}; run `reqforge auth set` or set JIRA_API_TOKEN"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Saves an API token to the OS keyring for later runs.
    pub fn store_token(email: &str, api_token: &str) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, email)?;
        entry.set_password(api_token)?;
        Ok(())
    }

    /// Removes the stored API token. Missing entries are not an error.
    pub fn clear_token(email: &str) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, email)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_basic_auth(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.email, self.api_token);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}
