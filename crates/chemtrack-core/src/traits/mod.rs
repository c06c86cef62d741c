//! Core traits defined in `chemtrack-core` and implemented by other crates.

pub mod record_store;
pub mod transport;

pub use record_store::RecordStore;
pub use transport::NotificationTransport;
