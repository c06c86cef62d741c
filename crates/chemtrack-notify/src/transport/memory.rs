//! Transport that records deliveries in memory.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use chemtrack_core::error::AppError;
use chemtrack_core::result::AppResult;
use chemtrack_core::traits::NotificationTransport;

/// Delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Email.
    Email,
    /// Push notification.
    Push,
}

/// A recorded delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Channel used.
    pub channel: Channel,
    /// Email address or push token.
    pub recipient: String,
    /// Subject or push title.
    pub title: String,
    /// Email HTML or push body.
    pub body: String,
}

/// Captures every successful send. Recipients registered with
/// [`MemoryTransport::fail_for`] fail instead.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    deliveries: Mutex<Vec<Delivery>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `recipient` fail.
    pub fn fail_for(&self, recipient: &str) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(recipient.to_string());
    }

    /// Snapshot of recorded deliveries, in send order.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of recorded deliveries on a channel.
    pub fn count(&self, channel: Channel) -> usize {
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|d| d.channel == channel)
            .count()
    }

    fn record(&self, channel: Channel, recipient: &str, title: &str, body: &str) -> AppResult<()> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(recipient);
        if failing {
            return Err(AppError::external_service(format!(
                "delivery to '{recipient}' rejected"
            )));
        }

        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Delivery {
                channel,
                recipient: recipient.to_string(),
                title: title.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}

#[async_trait]
impl NotificationTransport for MemoryTransport {
    async fn send_email(&self, address: &str, subject: &str, body_html: &str) -> AppResult<()> {
        self.record(Channel::Email, address, subject, body_html)
    }

    async fn send_push(&self, token: &str, title: &str, body: &str) -> AppResult<()> {
        self.record(Channel::Push, token, title, body)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
