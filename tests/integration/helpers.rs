//! Shared test helpers for integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use chemtrack_core::config::AppConfig;
use chemtrack_database::MemoryRecordStore;
use chemtrack_monitor::{ChemicalMonitor, CycleOutcome, CycleReport};
use chemtrack_notify::MemoryTransport;

/// Path of the sample seed shipped in `config/`.
pub const SEED_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/seed.example.json");

/// Path of the sample configuration shipped in `config/`.
pub const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");

/// Monitor wired to an in-memory store and a capturing transport
pub struct TestMonitor {
    /// Monitor under test
    pub monitor: Arc<ChemicalMonitor>,
    /// Store backing the monitor
    pub store: Arc<MemoryRecordStore>,
    /// Transport capturing every delivery
    pub transport: Arc<MemoryTransport>,
}

impl TestMonitor {
    /// Monitor over the sample seed with default settings
    pub async fn seeded() -> Self {
        let store = MemoryRecordStore::from_seed_file(SEED_PATH)
            .await
            .expect("Failed to load seed");
        Self::with_store(store, &AppConfig::default())
    }

    /// Monitor over the given store
    pub fn with_store(store: MemoryRecordStore, config: &AppConfig) -> Self {
        let store = Arc::new(store);
        let transport = Arc::new(MemoryTransport::new());
        let monitor = Arc::new(ChemicalMonitor::new(store.clone(), transport.clone(), config));
        Self {
            monitor,
            store,
            transport,
        }
    }

    /// Run one cycle at `now`, failing the test if it was skipped or errored
    pub async fn run_at(&self, now: DateTime<Utc>) -> CycleReport {
        match self.monitor.trigger_at(now).await.expect("cycle failed") {
            CycleOutcome::Completed(report) => report,
            CycleOutcome::Skipped => panic!("cycle was skipped"),
        }
    }
}

/// Midday UTC on the given date
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid instant")
}
