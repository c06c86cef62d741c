//! # chemtrack-entity
//!
//! Domain records for the ChemTrack monitor. Chemical and user records are
//! parsed from raw store documents here, and nowhere else; everything
//! downstream works with the typed forms. Alert conditions, recipient sets
//! and composed messages are derived value objects that are never stored.

pub mod alert;
pub mod chemical;
pub mod error;
mod fields;
pub mod user;

pub use alert::{AlertCondition, AlertKind, AlertMessage, RecipientSet};
pub use chemical::{ChemicalRecord, StockLevel};
pub use error::RecordError;
pub use user::UserRecord;
