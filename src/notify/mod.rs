// =============================================================================
// Report Delivery
// =============================================================================

use std::future::Future;

use anyhow::Result;

pub mod telegram;

pub use telegram::TelegramNotifier;

/// Sink for rendered report text.
pub trait Notifier: Send + Sync {
    fn send(&self, text: &str) -> impl Future<Output = Result<()>> + Send;
}
