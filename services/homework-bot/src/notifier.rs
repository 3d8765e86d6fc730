//! Notifier trait for delivering messages to the user

use async_trait::async_trait;

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Deliver `message` to the configured destination
    async fn notify(&self, message: &str) -> crate::Result<()>;
}
