//! PostgreSQL JSONB document store.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use tracing::{info, warn};

use chemtrack_core::config::DatabaseConfig;
use chemtrack_core::error::{AppError, ErrorKind};
use chemtrack_core::result::AppResult;
use chemtrack_core::traits::RecordStore;
use chemtrack_core::types::{Document, FieldFilter};

/// Record store over a single `documents(collection, id, data)` table.
///
/// Equality filters are evaluated with JSONB containment, so they hit the
/// GIN index on `data`.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

/// Schema for the `documents` table.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

impl PgRecordStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool, optionally apply the schema, and check that the
    /// `documents` table is there before any cycle runs against it.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            server = %server_of(&config.url),
            max_connections = config.max_connections,
            "Opening chemical inventory store"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Inventory store at '{}' is unreachable", server_of(&config.url)),
                    e,
                )
            })?;

        if config.run_migrations {
            MIGRATOR.run(&pool).await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to apply documents schema", e)
            })?;
            info!("Documents schema is up to date");
        }

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> AppResult<()> {
        let present: bool =
            sqlx::query_scalar("SELECT to_regclass('documents') IS NOT NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to inspect inventory schema",
                        e,
                    )
                })?;

        if !present {
            return Err(AppError::configuration(
                "Table 'documents' not found; set store.database.run_migrations = true",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn scan_all(&self, collection: &str) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, (String, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to scan collection '{collection}'"),
                e,
            )
        })?;

        Ok(into_documents(collection, rows))
    }

    async fn query_where(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, (String, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 AND data @> $2 ORDER BY id",
        )
        .bind(collection)
        .bind(Json(FieldFilter::to_containment(filters)))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to query collection '{collection}'"),
                e,
            )
        })?;

        Ok(into_documents(collection, rows))
    }
}

fn into_documents(collection: &str, rows: Vec<(String, Json<Value>)>) -> Vec<Document> {
    rows.into_iter()
        .filter_map(|(id, Json(data))| {
            let doc = Document::from_value(id.clone(), data);
            if doc.is_none() {
                warn!(collection, id = %id, "Ignoring non-object document");
            }
            doc
        })
        .collect()
}

/// Host part of a connection URL, without scheme, credentials or query.
fn server_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = rest.rsplit_once('@').map_or(rest, |(_, host)| host);
    rest.split(['/', '?']).next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_rows_are_dropped() {
        let rows = vec![
            ("c1".to_string(), Json(json!({"CAS": 64175, "school": "Lincoln High"}))),
            ("c2".to_string(), Json(json!(["not", "a", "document"]))),
            ("c3".to_string(), Json(Value::Null)),
            ("c4".to_string(), Json(json!({"CAS": "7647-01-0"}))),
        ];

        let docs = into_documents("chemicals", rows);

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c4"]);
        assert_eq!(docs[0].get("school"), Some(&json!("Lincoln High")));
    }

    #[test]
    fn test_server_of_hides_credentials() {
        assert_eq!(
            server_of("postgres://chemtrack:secret@db:5432/inventory?sslmode=require"),
            "db:5432"
        );
        assert_eq!(server_of("postgres://db/inventory"), "db");
        assert_eq!(server_of("db:5432"), "db:5432");
    }
}
