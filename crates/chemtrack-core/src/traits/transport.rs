//! Outbound notification channels.

use async_trait::async_trait;

use crate::result::AppResult;

/// Sends a single email or push notification.
///
/// Each call targets exactly one recipient. The caller only distinguishes
/// success from failure.
#[async_trait]
pub trait NotificationTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Send an HTML email to one address.
    async fn send_email(&self, address: &str, subject: &str, body_html: &str) -> AppResult<()>;

    /// Send a push notification to one device token.
    async fn send_push(&self, token: &str, title: &str, body: &str) -> AppResult<()>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}
