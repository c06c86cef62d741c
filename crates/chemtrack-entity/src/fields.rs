//! Typed accessors over a raw document.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use chemtrack_core::types::Document;

use crate::error::RecordError;

/// Date format used by the API for date-only fields.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn required<'a>(doc: &'a Document, field: &'static str) -> Result<&'a Value, RecordError> {
    match doc.get(field) {
        None | Some(Value::Null) => Err(RecordError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

pub(crate) fn required_str<'a>(doc: &'a Document, field: &'static str) -> Result<&'a str, RecordError> {
    required(doc, field)?
        .as_str()
        .ok_or(RecordError::InvalidType {
            field,
            expected: "a string",
        })
}

/// Absent or null yields `None`; any other non-string is an error.
pub(crate) fn optional_str<'a>(
    doc: &'a Document,
    field: &'static str,
) -> Result<Option<&'a str>, RecordError> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(RecordError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

/// Absent or null reads as `false`.
pub(crate) fn flag(doc: &Document, field: &'static str) -> Result<bool, RecordError> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(RecordError::InvalidType {
            field,
            expected: "a boolean",
        }),
    }
}

/// Accepts a `YYYY-MM-DD` string or an RFC 3339 timestamp, which is
/// truncated to its UTC date.
pub(crate) fn date(doc: &Document, field: &'static str) -> Result<NaiveDate, RecordError> {
    let raw = required_str(doc, field).map_err(|e| match e {
        RecordError::InvalidType { field, .. } => RecordError::InvalidType {
            field,
            expected: "a date string",
        },
        other => other,
    })?;

    parse_date(raw).ok_or_else(|| RecordError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc).date_naive())
    })
}
