//! User accounts as seen by the alert fan-out.

pub mod model;

pub use model::UserRecord;
