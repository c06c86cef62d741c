//! # chemtrack-database
//!
//! Record store gateways for the ChemTrack monitor: a PostgreSQL JSONB
//! document table and an in-memory store for local runs and tests.

pub mod store;

pub use store::{MemoryRecordStore, PgRecordStore, build_store};
