//! A composed alert, ready for delivery on every channel.

use serde::{Deserialize, Serialize};

/// One organization's consolidated alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    /// Organization the alert is about.
    pub organization: String,
    /// Email subject line.
    pub subject: String,
    /// Email body (HTML).
    pub html_body: String,
    /// Push notification title.
    pub push_title: String,
    /// Push notification body (plain text).
    pub push_body: String,
}
