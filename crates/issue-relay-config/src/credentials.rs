//! Required secrets and destination, read once at startup
//!
//! Variables are read from the process environment after loading a `.env`
//! file if one is present. A missing or empty value is fatal.

use crate::error::ConfigError;

/// GitHub personal access token
pub const GITHUB_TOKEN_VAR: &str = "PAT";
/// Slack bot token
pub const SLACK_TOKEN_VAR: &str = "SLACK_TOKEN";
/// Slack channel to post to
pub const CHANNEL_ID_VAR: &str = "CHANNEL_ID";

/// Credentials and destination needed before any network call
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub github_token: String,
    pub slack_token: String,
    pub channel_id: String,
}

impl Credentials {
    /// Read credentials from the environment, loading `.env` first
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded .env file from: {:?}", path),
            Err(_) => log::debug!(".env file not found, relying on environment variables"),
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str, purpose: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar { name, purpose })
        };

        Ok(Self {
            github_token: require(GITHUB_TOKEN_VAR, "GitHub access token")?,
            slack_token: require(SLACK_TOKEN_VAR, "Slack bot token")?,
            channel_id: require(CHANNEL_ID_VAR, "Slack channel to notify")?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &"<redacted>")
            .field("slack_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}
