//! Threshold evaluation for a single chemical.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

use chemtrack_core::types::Document;
use chemtrack_entity::{AlertCondition, AlertKind, ChemicalRecord};

/// Maps a chemical and a reference time to the alerts that apply.
///
/// Rules are independent: an expired chemical is also inside the
/// expiring-soon window, and both conditions are reported.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdEvaluator {
    window: Months,
}

impl ThresholdEvaluator {
    /// Create an evaluator with an expiring-soon window in calendar months.
    pub fn new(window_months: u32) -> Self {
        Self {
            window: Months::new(window_months),
        }
    }

    /// Evaluate a record against an instant, compared at date granularity (UTC).
    pub fn evaluate(&self, record: &ChemicalRecord, now: DateTime<Utc>) -> Vec<AlertCondition> {
        self.evaluate_on(record, now.date_naive())
    }

    /// Evaluate a record against a calendar date.
    pub fn evaluate_on(&self, record: &ChemicalRecord, today: NaiveDate) -> Vec<AlertCondition> {
        let horizon = add_months_rolling(today, self.window).unwrap_or(NaiveDate::MAX);
        let expiry = record.expiration_date;

        AlertKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                AlertKind::LowStock => record.stock_level.is_low(),
                AlertKind::Expired => expiry < today,
                AlertKind::ExpiringSoon => expiry < horizon,
            })
            .map(|kind| AlertCondition {
                kind,
                cas_number: record.cas_number.clone(),
                organization: record.organization.clone(),
                expiration_date: (kind != AlertKind::LowStock).then_some(expiry),
            })
            .collect()
    }

    /// Evaluate a raw document. Documents that do not parse yield nothing.
    pub fn evaluate_document(&self, doc: &Document, now: DateTime<Utc>) -> Vec<AlertCondition> {
        ChemicalRecord::try_from(doc)
            .map(|record| self.evaluate(&record, now))
            .unwrap_or_default()
    }
}

/// Add calendar months, rolling a day past the target month's end over
/// into the following month (Aug 31 + 6 months is Mar 2 in a leap year).
fn add_months_rolling(date: NaiveDate, months: Months) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(months)?
        .checked_add_days(Days::new(u64::from(date.day0())))
}
