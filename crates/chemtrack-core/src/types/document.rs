//! Raw documents as returned by the record store.
//!
//! Documents are loosely typed field maps. Typed records are produced from
//! them in `chemtrack-entity`; nothing outside that boundary should inspect
//! the map directly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document's field map.
pub type FieldMap = Map<String, Value>;

/// A single stored document: an opaque identifier plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: String,
    /// Raw document fields.
    pub fields: FieldMap,
}

impl Document {
    /// Create a document from an id and a field map.
    pub fn new(id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Create a document from a JSON value.
    ///
    /// Returns `None` if the value is not a JSON object.
    pub fn from_value(id: impl Into<String>, value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(id, fields)),
            _ => None,
        }
    }

    /// Look up a raw field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether every filter matches this document.
    pub fn matches(&self, filters: &[FieldFilter]) -> bool {
        filters.iter().all(|f| f.matches(self))
    }
}

/// Equality filter on a top-level document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    /// Field name.
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

impl FieldFilter {
    /// Build an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the document's field equals the filter value.
    ///
    /// A missing field never matches.
    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field).is_some_and(|v| *v == self.value)
    }

    /// Fold a set of filters into one JSON object, suitable for a
    /// containment query.
    pub fn to_containment(filters: &[FieldFilter]) -> Value {
        let map: FieldMap = filters
            .iter()
            .map(|f| (f.field.clone(), f.value.clone()))
            .collect();
        Value::Object(map)
    }
}
