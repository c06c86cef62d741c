//! `NotificationTransport` implementations shipped with the monitor.
//!
//! Real email and push providers live outside this repository and plug in
//! through the same trait.

pub mod log;
pub mod memory;

use std::sync::Arc;

use chemtrack_core::config::{NotifyConfig, TransportProvider};
use chemtrack_core::traits::NotificationTransport;

pub use self::log::LogTransport;
pub use self::memory::MemoryTransport;

/// Build the configured transport.
pub fn build_transport(config: &NotifyConfig) -> Arc<dyn NotificationTransport> {
    match config.provider {
        TransportProvider::Log => Arc::new(LogTransport),
        TransportProvider::Memory => Arc::new(MemoryTransport::new()),
    }
}
