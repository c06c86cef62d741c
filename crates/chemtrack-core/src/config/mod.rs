//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod logging;
pub mod monitor;
pub mod notify;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::monitor::MonitorConfig;
pub use self::notify::{NotifyConfig, TransportProvider};
pub use self::store::{DatabaseConfig, StoreConfig, StoreProvider};

use crate::error::AppError;

/// Root application configuration.
///
/// Every section has defaults, so an empty file yields a runnable
/// configuration backed by the in-memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Monitoring job settings.
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Notification delivery settings.
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional. Environment variables prefixed with
    /// `CHEMTRACK__` override file values, e.g.
    /// `CHEMTRACK__STORE__DATABASE__URL`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("CHEMTRACK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.monitor.interval_seconds == 0 && self.monitor.cron.is_none() {
            return Err(AppError::configuration(
                "monitor.interval_seconds must be greater than zero",
            ));
        }
        if self.monitor.expiring_window_months == 0 {
            return Err(AppError::configuration(
                "monitor.expiring_window_months must be greater than zero",
            ));
        }
        if self.monitor.organization_concurrency == 0 {
            return Err(AppError::configuration(
                "monitor.organization_concurrency must be greater than zero",
            ));
        }
        if self.notify.send_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "notify.send_timeout_seconds must be greater than zero",
            ));
        }
        if self.store.provider == StoreProvider::Postgres && self.store.database.url.is_empty() {
            return Err(AppError::configuration(
                "store.database.url is required for the postgres provider",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.interval_seconds, 30 * 24 * 60 * 60);
        assert_eq!(config.monitor.expiring_window_months, 6);
        assert_eq!(config.store.provider, StoreProvider::Memory);
        assert_eq!(config.store.chemicals_collection, "chemicals");
        assert_eq!(config.store.users_collection, "users");
    }

    #[test]
    fn test_zero_send_timeout_rejected() {
        let mut config = AppConfig::default();
        config.notify.send_timeout_seconds = 0;
        let err = config.validate().expect_err("zero timeout");
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
        assert!(err.message.contains("send_timeout_seconds"));
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Postgres;
        assert!(config.validate().is_err());

        config.store.database.url = "postgres://localhost/chemtrack".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "monitor": { "run_on_startup": true },
            "notify": { "send_timeout_seconds": 3 }
        }))
        .expect("deserialize");

        assert!(config.monitor.run_on_startup);
        assert_eq!(config.monitor.organization_concurrency, 4);
        assert_eq!(config.notify.send_timeout_seconds, 3);
        assert_eq!(config.notify.provider, TransportProvider::Log);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = AppConfig::default();
        config.monitor.expiring_window_months = 0;
        assert!(config.validate().is_err());
    }
}
