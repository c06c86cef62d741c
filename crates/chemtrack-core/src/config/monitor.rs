//! Chemical monitoring job configuration.

use serde::{Deserialize, Serialize};

/// Settings for the periodic chemical-status check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Whether the scheduled job is registered at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between scheduled cycles. Ignored when `cron` is set.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Optional six-field cron expression overriding the interval.
    #[serde(default)]
    pub cron: Option<String>,
    /// Run one cycle as soon as the scheduler starts.
    #[serde(default)]
    pub run_on_startup: bool,
    /// Months ahead of today that count as "expiring soon".
    #[serde(default = "default_window_months")]
    pub expiring_window_months: u32,
    /// Number of organizations dispatched concurrently within a cycle.
    #[serde(default = "default_organization_concurrency")]
    pub organization_concurrency: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_seconds: default_interval(),
            cron: None,
            run_on_startup: false,
            expiring_window_months: default_window_months(),
            organization_concurrency: default_organization_concurrency(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    30 * 24 * 60 * 60
}

fn default_window_months() -> u32 {
    6
}

fn default_organization_concurrency() -> usize {
    4
}
