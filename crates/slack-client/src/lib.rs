//! Slack notification client
//!
//! Posts plain-text messages to a Slack channel through the Web API
//! (`chat.postMessage`). Callers depend on the `ChatNotifier` trait so the
//! delivery side can be swapped out in tests.

pub mod error;
pub mod notifier;
pub mod slack;

/// Base URL of the Slack Web API
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

pub use error::NotifyError;
pub use notifier::ChatNotifier;
pub use slack::SlackClient;
