//! Slack Web API client
//!
//! Uses `chat.postMessage` with a bot token. Slack reports most API-level
//! failures with HTTP 200 and `"ok": false`, so both the status code and
//! the response body are checked.

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::notifier::ChatNotifier;
use crate::DEFAULT_BASE_URL;

/// Slack client authenticated with a bot token
pub struct SlackClient {
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl SlackClient {
    /// Create a client talking to the public Slack API.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against a different API root (e.g. a test server).
    #[must_use]
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn post_message_url(&self) -> String {
        format!("{}/chat.postMessage", self.base_url)
    }
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatNotifier for SlackClient {
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), NotifyError> {
        let payload = PostMessageRequest { channel, text };

        debug!("Posting {} bytes to Slack channel {}", text.len(), channel);

        let response = self
            .client
            .post(self.post_message_url())
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Slack request failed with {}: {}", status, body);
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: PostMessageResponse = response.json().await?;
        if reply.ok {
            debug!("Slack message posted to {}", channel);
            Ok(())
        } else {
            let reason = reply.error.unwrap_or_else(|| "unknown_error".to_string());
            warn!("Slack rejected message for {}: {}", channel, reason);
            Err(NotifyError::Api(reason))
        }
    }
}

// =============================================================================
// Slack API types
// =============================================================================

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}
