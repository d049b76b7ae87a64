pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

pub use telegram::TelegramNotifier;

/// Outbound message sink. Fire-and-forget from the caller's point of view;
/// implementations own their timeout and retry policy. The destination
/// channel is bound at construction.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<()>;
}
