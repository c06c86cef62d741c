//! # chemtrack-notify
//!
//! Turns an organization's alert conditions into one consolidated message
//! and delivers it to every recipient individually, over each channel the
//! recipient opted into.

pub mod dispatcher;
pub mod formatter;
pub mod transport;

pub use dispatcher::{AlertDispatcher, DeliverySummary};
pub use formatter::AlertFormatter;
pub use transport::{LogTransport, MemoryTransport, build_transport};
