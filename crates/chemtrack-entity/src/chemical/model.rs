//! Chemical record parsed from a store document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use chemtrack_core::types::Document;

use crate::error::RecordError;
use crate::fields;

use super::stock::StockLevel;

/// Stored field names for chemical documents.
pub mod field {
    /// CAS registry number.
    pub const CAS: &str = "CAS";
    /// Owning organization.
    pub const SCHOOL: &str = "school";
    /// Expiration date.
    pub const EXPIRATION_DATE: &str = "expiration_date";
    /// Stock level.
    pub const QUANTITY: &str = "quantity";
}

/// A chemical that can take part in threshold evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemicalRecord {
    /// Store identifier.
    pub id: String,
    /// CAS number, rendered as text.
    pub cas_number: String,
    /// Owning organization.
    pub organization: String,
    /// Expiration date (no time of day).
    pub expiration_date: NaiveDate,
    /// Stock status.
    pub stock_level: StockLevel,
}

impl TryFrom<&Document> for ChemicalRecord {
    type Error = RecordError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        let cas_number = cas(doc)?;
        let organization = fields::required_str(doc, field::SCHOOL)?;
        let expiration_date = fields::date(doc, field::EXPIRATION_DATE)?;
        let quantity = fields::required_str(doc, field::QUANTITY)?;

        Ok(Self {
            id: doc.id.clone(),
            cas_number,
            organization: organization.to_string(),
            expiration_date,
            stock_level: StockLevel::from_raw(quantity),
        })
    }
}

/// The API stores CAS either as a JSON number or as a digit string.
fn cas(doc: &Document) -> Result<String, RecordError> {
    match fields::required(doc, field::CAS)? {
        Value::Number(n) => Ok(n
            .as_u64()
            .map(|v| v.to_string())
            .unwrap_or_else(|| n.to_string())),
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::String(_) => Err(RecordError::MissingField(field::CAS)),
        _ => Err(RecordError::InvalidType {
            field: field::CAS,
            expected: "a number or string",
        }),
    }
}
