//! In-memory document store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use chemtrack_core::error::{AppError, ErrorKind};
use chemtrack_core::result::AppResult;
use chemtrack_core::traits::RecordStore;
use chemtrack_core::types::{Document, FieldFilter};

/// Process-local record store.
///
/// Documents keep insertion order within a collection. Seed files are JSON
/// objects mapping collection names to arrays of documents; each document's
/// `id` field becomes its identifier.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON seed file.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Io,
                format!("Failed to read seed file '{}'", path.display()),
                e,
            )
        })?;
        let store = Self::from_seed_str(&raw)?;
        info!(path = %path.display(), "Loaded seed documents");
        Ok(store)
    }

    /// Load a store from seed JSON text.
    pub fn from_seed_str(raw: &str) -> AppResult<Self> {
        let root: Value = serde_json::from_str(raw)?;
        let Value::Object(collections) = root else {
            return Err(AppError::validation(
                "Seed data must be an object of collection arrays",
            ));
        };

        let store = Self::new();
        for (collection, entries) in collections {
            let Value::Array(entries) = entries else {
                return Err(AppError::validation(format!(
                    "Seed collection '{collection}' must be an array"
                )));
            };
            for (index, entry) in entries.into_iter().enumerate() {
                let Value::Object(mut fields) = entry else {
                    return Err(AppError::validation(format!(
                        "Seed entry {index} in '{collection}' must be an object"
                    )));
                };
                let id = match fields.remove("id") {
                    Some(Value::String(s)) => s,
                    Some(Value::Number(n)) => n.to_string(),
                    _ => format!("{collection}-{index}"),
                };
                store.insert(&collection, Document::new(id, fields));
            }
        }
        Ok(store)
    }

    /// Insert or replace a document.
    pub fn insert(&self, collection: &str, doc: Document) {
        let mut map = self.collections.write().unwrap_or_else(|e| e.into_inner());
        let docs = map.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc,
            None => docs.push(doc),
        }
    }

    /// Insert a document from a JSON object. Non-objects are ignored.
    pub fn insert_value(&self, collection: &str, id: &str, value: Value) {
        if let Value::Object(fields) = value {
            self.insert(collection, Document::new(id, fields));
        }
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        let map = self.collections.read().unwrap_or_else(|e| e.into_inner());
        map.get(collection).map_or(0, Vec::len)
    }

    /// Whether a collection has no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn scan_all(&self, collection: &str) -> AppResult<Vec<Document>> {
        let map = self.collections.read().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(collection).cloned().unwrap_or_default())
    }

    async fn query_where(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> AppResult<Vec<Document>> {
        let map = self.collections.read().unwrap_or_else(|e| e.into_inner());
        Ok(map
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.matches(filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SEED: &str = r#"{
        "chemicals": [
            {"id": "c1", "CAS": 64175, "school": "Lincoln High"},
            {"CAS": 67641, "school": "Roosevelt"}
        ],
        "users": [
            {"id": "u1", "is_admin": true, "school": "Lincoln High"},
            {"id": "u2", "is_master": true},
            {"id": "u3", "is_admin": true, "school": "Roosevelt"}
        ]
    }"#;

    #[tokio::test]
    async fn test_seed_and_scan() {
        let store = MemoryRecordStore::from_seed_str(SEED).expect("seed");
        let chemicals = store.scan_all("chemicals").await.unwrap();

        assert_eq!(chemicals.len(), 2);
        assert_eq!(chemicals[0].id, "c1");
        assert!(chemicals[0].get("id").is_none());
        assert_eq!(chemicals[1].id, "chemicals-1");
    }

    #[tokio::test]
    async fn test_query_where_combines_filters() {
        let store = MemoryRecordStore::from_seed_str(SEED).expect("seed");

        let admins = store
            .query_where(
                "users",
                &[
                    FieldFilter::eq("is_admin", true),
                    FieldFilter::eq("school", "Lincoln High"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].id, "u1");

        let masters = store
            .query_where("users", &[FieldFilter::eq("is_master", true)])
            .await
            .unwrap();
        assert_eq!(masters.len(), 1);
        assert_eq!(masters[0].id, "u2");
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryRecordStore::new();
        assert!(store.scan_all("chemicals").await.unwrap().is_empty());
        assert!(store.is_empty("chemicals"));
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let store = MemoryRecordStore::new();
        store.insert_value("users", "u1", json!({"email": "old@x.com"}));
        store.insert_value("users", "u1", json!({"email": "new@x.com"}));
        assert_eq!(store.len("users"), 1);
    }

    #[test]
    fn test_invalid_seed_shapes() {
        assert!(MemoryRecordStore::from_seed_str("[]").is_err());
        assert!(MemoryRecordStore::from_seed_str(r#"{"users": {}}"#).is_err());
        assert!(MemoryRecordStore::from_seed_str(r#"{"users": [1]}"#).is_err());
        assert!(MemoryRecordStore::from_seed_str("not json").is_err());
    }
}
