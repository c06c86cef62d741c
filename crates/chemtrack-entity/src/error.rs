//! Reasons a raw document cannot become a typed record.

use thiserror::Error;

/// A document that cannot be parsed into a record.
///
/// These are never fatal; callers skip the document and move on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required field is absent or null.
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// A field is present but has the wrong JSON type.
    #[error("field '{field}' should be {expected}")]
    InvalidType {
        /// Field name.
        field: &'static str,
        /// Expected type description.
        expected: &'static str,
    },

    /// A date field could not be parsed.
    #[error("field '{field}' has unparseable date '{value}'")]
    InvalidDate {
        /// Field name.
        field: &'static str,
        /// Raw value.
        value: String,
    },
}
