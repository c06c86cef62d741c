//! Per-recipient alert delivery.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use chemtrack_core::error::AppError;
use chemtrack_core::result::AppResult;
use chemtrack_core::traits::NotificationTransport;
use chemtrack_entity::{AlertMessage, RecipientSet};

/// Outcome counts for one or more dispatches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliverySummary {
    /// Emails accepted by the transport.
    pub emails_sent: usize,
    /// Emails that failed or timed out.
    pub emails_failed: usize,
    /// Pushes accepted by the transport.
    pub pushes_sent: usize,
    /// Pushes that failed or timed out.
    pub pushes_failed: usize,
}

impl DeliverySummary {
    /// Add another summary's counts to this one.
    pub fn merge(&mut self, other: DeliverySummary) {
        self.emails_sent += other.emails_sent;
        self.emails_failed += other.emails_failed;
        self.pushes_sent += other.pushes_sent;
        self.pushes_failed += other.pushes_failed;
    }

    /// Total failed sends across channels.
    pub fn failures(&self) -> usize {
        self.emails_failed + self.pushes_failed
    }
}

/// Sends one message to each recipient, one call per recipient per channel.
///
/// Every call is bounded by `send_timeout`. Failures are logged and counted;
/// they never stop delivery to the remaining recipients.
#[derive(Debug, Clone)]
pub struct AlertDispatcher {
    transport: Arc<dyn NotificationTransport>,
    send_timeout: Duration,
}

impl AlertDispatcher {
    /// Create a dispatcher over a transport.
    pub fn new(transport: Arc<dyn NotificationTransport>, send_timeout: Duration) -> Self {
        Self {
            transport,
            send_timeout,
        }
    }

    /// Deliver a message to every email address and push token.
    pub async fn dispatch(&self, recipients: &RecipientSet, message: &AlertMessage) -> DeliverySummary {
        let mut summary = DeliverySummary::default();

        for address in &recipients.emails {
            let send = self
                .transport
                .send_email(address, &message.subject, &message.html_body);
            match self.bounded(send).await {
                Ok(()) => {
                    debug!(organization = %message.organization, recipient = %address, "Alert email sent");
                    summary.emails_sent += 1;
                }
                Err(e) => {
                    warn!(
                        organization = %message.organization,
                        recipient = %address,
                        transport = self.transport.name(),
                        "Failed to send alert email: {}",
                        e
                    );
                    summary.emails_failed += 1;
                }
            }
        }

        for token in &recipients.push_tokens {
            let send = self
                .transport
                .send_push(token, &message.push_title, &message.push_body);
            match self.bounded(send).await {
                Ok(()) => {
                    debug!(organization = %message.organization, "Alert push sent");
                    summary.pushes_sent += 1;
                }
                Err(e) => {
                    warn!(
                        organization = %message.organization,
                        transport = self.transport.name(),
                        "Failed to send alert push: {}",
                        e
                    );
                    summary.pushes_failed += 1;
                }
            }
        }

        summary
    }

    async fn bounded<F>(&self, send: F) -> AppResult<()>
    where
        F: std::future::Future<Output = AppResult<()>>,
    {
        tokio::time::timeout(self.send_timeout, send)
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "send did not complete within {}s",
                    self.send_timeout.as_secs()
                ))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::{Channel, MemoryTransport};
    use async_trait::async_trait;

    fn message() -> AlertMessage {
        AlertMessage {
            organization: "Lincoln High".to_string(),
            subject: "Chemical Alert Report for Lincoln High".to_string(),
            html_body: "<b>body</b>".to_string(),
            push_title: "Chemical Alert Report for Lincoln High".to_string(),
            push_body: "1 alert: 1 low stock, 0 expired, 0 expiring soon".to_string(),
        }
    }

    fn recipients(emails: &[&str], tokens: &[&str]) -> RecipientSet {
        RecipientSet {
            emails: emails.iter().map(|s| s.to_string()).collect(),
            push_tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_one_send_per_recipient_per_channel() {
        let transport = Arc::new(MemoryTransport::new());
        let dispatcher = AlertDispatcher::new(transport.clone(), Duration::from_secs(5));

        let summary = dispatcher
            .dispatch(&recipients(&["a@x.com", "b@x.com"], &["tok-1"]), &message())
            .await;

        assert_eq!(summary.emails_sent, 2);
        assert_eq!(summary.pushes_sent, 1);
        assert_eq!(summary.failures(), 0);

        let deliveries = transport.deliveries();
        assert_eq!(deliveries.len(), 3);
        assert_eq!(transport.count(Channel::Email), 2);
        let push = deliveries
            .iter()
            .find(|d| d.channel == Channel::Push)
            .expect("push delivery");
        assert_eq!(push.recipient, "tok-1");
        assert_eq!(push.body, message().push_body);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_remaining_recipients() {
        let transport = Arc::new(MemoryTransport::new());
        transport.fail_for("a@x.com");
        let dispatcher = AlertDispatcher::new(transport.clone(), Duration::from_secs(5));

        let summary = dispatcher
            .dispatch(&recipients(&["a@x.com", "b@x.com", "c@x.com"], &[]), &message())
            .await;

        assert_eq!(summary.emails_failed, 1);
        assert_eq!(summary.emails_sent, 2);
        assert_eq!(transport.count(Channel::Email), 2);
    }

    #[derive(Debug)]
    struct StalledTransport;

    #[async_trait]
    impl NotificationTransport for StalledTransport {
        async fn send_email(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn send_push(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let dispatcher = AlertDispatcher::new(Arc::new(StalledTransport), Duration::from_secs(2));

        let summary = dispatcher
            .dispatch(&recipients(&["a@x.com"], &["tok-1"]), &message())
            .await;

        assert_eq!(summary.emails_failed, 1);
        assert_eq!(summary.emails_sent, 0);
        assert_eq!(summary.pushes_sent, 1);
    }

    #[tokio::test]
    async fn test_empty_recipients_send_nothing() {
        let transport = Arc::new(MemoryTransport::new());
        let dispatcher = AlertDispatcher::new(transport.clone(), Duration::from_secs(5));

        let summary = dispatcher.dispatch(&RecipientSet::default(), &message()).await;

        assert_eq!(summary, DeliverySummary::default());
        assert!(transport.deliveries().is_empty());
    }

    #[test]
    fn test_merge() {
        let mut total = DeliverySummary {
            emails_sent: 1,
            ..Default::default()
        };
        total.merge(DeliverySummary {
            emails_sent: 2,
            pushes_failed: 1,
            ..Default::default()
        });
        assert_eq!(total.emails_sent, 3);
        assert_eq!(total.failures(), 1);
    }
}
