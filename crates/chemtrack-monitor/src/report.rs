//! Cycle results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use chemtrack_entity::AlertKind;
use chemtrack_notify::DeliverySummary;

/// Counts of raised conditions by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConditionCounts {
    /// Low-stock conditions.
    pub low_stock: usize,
    /// Expired conditions.
    pub expired: usize,
    /// Expiring-soon conditions.
    pub expiring_soon: usize,
}

impl ConditionCounts {
    /// Count one condition.
    pub fn record(&mut self, kind: AlertKind) {
        match kind {
            AlertKind::LowStock => self.low_stock += 1,
            AlertKind::Expired => self.expired += 1,
            AlertKind::ExpiringSoon => self.expiring_soon += 1,
        }
    }

    /// Total conditions.
    pub fn total(&self) -> usize {
        self.low_stock + self.expired + self.expiring_soon
    }
}

/// What happened during one monitoring cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Identifier used in this cycle's log span.
    pub cycle_id: Uuid,
    /// Reference instant for evaluation.
    pub evaluated_at: DateTime<Utc>,
    /// Chemical documents returned by the scan.
    pub documents_scanned: usize,
    /// Documents skipped as malformed.
    pub records_skipped: usize,
    /// Organizations with at least one condition.
    pub organizations_alerted: usize,
    /// Alerted organizations that had nobody to notify.
    pub organizations_without_recipients: usize,
    /// Alerted organizations whose recipients could not be resolved.
    pub organizations_failed: usize,
    /// Raised conditions.
    pub conditions: ConditionCounts,
    /// Delivery outcomes across all organizations.
    pub delivery: DeliverySummary,
}

impl CycleReport {
    /// Empty report for a cycle starting now.
    pub fn new(cycle_id: Uuid, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            cycle_id,
            evaluated_at,
            documents_scanned: 0,
            records_skipped: 0,
            organizations_alerted: 0,
            organizations_without_recipients: 0,
            organizations_failed: 0,
            conditions: ConditionCounts::default(),
            delivery: DeliverySummary::default(),
        }
    }
}

/// Result of a trigger.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// The cycle ran to completion.
    Completed(CycleReport),
    /// Another cycle was still running; nothing was done.
    Skipped,
}

impl CycleOutcome {
    /// The report, if the cycle ran.
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Skipped => None,
        }
    }
}
