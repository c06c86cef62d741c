//! Shared value types.

pub mod document;

pub use document::{Document, FieldFilter, FieldMap};
