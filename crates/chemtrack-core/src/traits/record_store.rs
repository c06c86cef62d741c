//! Read-only access to the document store.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::document::{Document, FieldFilter};

/// Read-only gateway to a document store.
///
/// Implementations return raw documents; parsing into typed records is
/// the caller's concern. An `Err` means the store itself failed, never that
/// a single document was malformed.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return every document in a collection.
    async fn scan_all(&self, collection: &str) -> AppResult<Vec<Document>>;

    /// Return documents whose fields equal every filter value.
    async fn query_where(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> AppResult<Vec<Document>>;
}
