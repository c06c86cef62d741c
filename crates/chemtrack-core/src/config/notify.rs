//! Notification delivery configuration.

use serde::{Deserialize, Serialize};

/// Which transport delivers alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProvider {
    /// Write each delivery to the log instead of sending it.
    Log,
    /// Capture deliveries in memory.
    Memory,
}

/// Notification delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Transport provider.
    #[serde(default = "default_provider")]
    pub provider: TransportProvider,
    /// Per-send timeout in seconds.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            send_timeout_seconds: default_send_timeout(),
        }
    }
}

fn default_provider() -> TransportProvider {
    TransportProvider::Log
}

fn default_send_timeout() -> u64 {
    10
}
