//! `RecordStore` implementations and the provider factory.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use tracing::info;

use chemtrack_core::config::{StoreConfig, StoreProvider};
use chemtrack_core::result::AppResult;
use chemtrack_core::traits::RecordStore;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

/// Build the configured record store.
pub async fn build_store(config: &StoreConfig) -> AppResult<Arc<dyn RecordStore>> {
    match config.provider {
        StoreProvider::Postgres => Ok(Arc::new(PgRecordStore::connect(&config.database).await?)),
        StoreProvider::Memory => {
            let store = match &config.seed_file {
                Some(path) => MemoryRecordStore::from_seed_file(path).await?,
                None => MemoryRecordStore::new(),
            };
            info!(
                seed_file = config.seed_file.as_deref().unwrap_or("-"),
                "Using in-memory record store"
            );
            Ok(Arc::new(store))
        }
    }
}
