//! Chat notifier trait

use crate::error::NotifyError;
use async_trait::async_trait;

/// Delivers a plain-text message to a chat channel
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Post `text` to `channel` as a single message
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), NotifyError>;
}
