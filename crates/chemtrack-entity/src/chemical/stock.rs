//! Stock level of a chemical.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stock status as entered through the API.
///
/// Only `"Low"` (exact, case-sensitive) is meaningful to the monitor; any
/// other value is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockLevel {
    /// Stock is low.
    Low,
    /// Any other status.
    Other(String),
}

impl StockLevel {
    /// Raw value marking low stock.
    pub const LOW: &'static str = "Low";

    /// Classify a raw stock value.
    pub fn from_raw(raw: &str) -> Self {
        if raw == Self::LOW {
            Self::Low
        } else {
            Self::Other(raw.to_string())
        }
    }

    /// Whether this level is low.
    pub fn is_low(&self) -> bool {
        matches!(self, Self::Low)
    }

    /// Return the raw value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => Self::LOW,
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_is_case_sensitive() {
        assert!(StockLevel::from_raw("Low").is_low());
        assert!(!StockLevel::from_raw("low").is_low());
        assert!(!StockLevel::from_raw("LOW").is_low());
        assert!(!StockLevel::from_raw(" Low").is_low());
    }

    #[test]
    fn test_other_keeps_raw_value() {
        let level = StockLevel::from_raw("Plenty");
        assert_eq!(level, StockLevel::Other("Plenty".to_string()));
        assert_eq!(level.to_string(), "Plenty");
    }
}
