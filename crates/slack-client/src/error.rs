//! Error types for message delivery.

use thiserror::Error;

/// Errors that can occur when posting a message.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Slack answered with a non-success HTTP status
    #[error("Slack returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Slack accepted the request but reported `ok: false`
    #[error("Slack API error: {0}")]
    Api(String),
}
