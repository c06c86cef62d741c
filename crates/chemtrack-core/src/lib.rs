//! # chemtrack-core
//!
//! Core crate for the ChemTrack monitor. Contains the record-store and
//! notification-transport traits, the raw document type, configuration
//! schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ChemTrack crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
