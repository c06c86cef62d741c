//! Transport that writes deliveries to the log.

use async_trait::async_trait;
use tracing::info;

use chemtrack_core::result::AppResult;
use chemtrack_core::traits::NotificationTransport;

/// Logs every send at `info` and reports success. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn send_email(&self, address: &str, subject: &str, body_html: &str) -> AppResult<()> {
        info!(
            channel = "email",
            recipient = %address,
            subject = %subject,
            body_len = body_html.len(),
            "Dry-run delivery"
        );
        Ok(())
    }

    async fn send_push(&self, token: &str, title: &str, body: &str) -> AppResult<()> {
        info!(
            channel = "push",
            recipient = %token,
            title = %title,
            body = %body,
            "Dry-run delivery"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
