//! Alert conditions raised by threshold evaluation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of alert. Variants are declared in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Stock level is low.
    LowStock,
    /// Expiration date has passed.
    Expired,
    /// Expiration date falls within the warning window.
    ExpiringSoon,
}

impl AlertKind {
    /// All kinds, in reporting order.
    pub const ALL: [AlertKind; 3] = [Self::LowStock, Self::Expired, Self::ExpiringSoon];

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowStock => "low_stock",
            Self::Expired => "expired",
            Self::ExpiringSoon => "expiring_soon",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One alert raised for one chemical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertCondition {
    /// What triggered.
    pub kind: AlertKind,
    /// CAS number of the chemical.
    pub cas_number: String,
    /// Organization owning the chemical.
    pub organization: String,
    /// Expiration date, for expiry-related kinds.
    pub expiration_date: Option<NaiveDate>,
}
