//! Record store configuration.

use serde::{Deserialize, Serialize};

/// Which record store backs the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// PostgreSQL JSONB document table.
    Postgres,
    /// In-process store, optionally seeded from a JSON file.
    Memory,
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider.
    #[serde(default = "default_provider")]
    pub provider: StoreProvider,
    /// Collection holding chemical documents.
    #[serde(default = "default_chemicals_collection")]
    pub chemicals_collection: String,
    /// Collection holding user documents.
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
    /// JSON seed file for the memory provider.
    #[serde(default)]
    pub seed_file: Option<String>,
    /// PostgreSQL settings for the postgres provider.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            chemicals_collection: default_chemicals_collection(),
            users_collection: default_users_collection(),
            seed_file: None,
            database: DatabaseConfig::default(),
        }
    }
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    #[serde(default)]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Apply bundled migrations on startup.
    #[serde(default)]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            run_migrations: false,
        }
    }
}

fn default_provider() -> StoreProvider {
    StoreProvider::Memory
}

fn default_chemicals_collection() -> String {
    "chemicals".to_string()
}

fn default_users_collection() -> String {
    "users".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}
