//! Chemical status monitoring for ChemTrack.
//!
//! This crate provides:
//! - A threshold evaluator classifying chemicals as low stock, expired or
//!   expiring soon
//! - A recipient resolver computing deduplicated email and push targets
//!   per organization
//! - The monitor that runs one scan-evaluate-aggregate-dispatch cycle
//! - A scheduler that triggers the monitor periodically

pub mod evaluator;
pub mod monitor;
pub mod report;
pub mod resolver;
pub mod scheduler;

pub use evaluator::ThresholdEvaluator;
pub use monitor::ChemicalMonitor;
pub use report::{CycleOutcome, CycleReport};
pub use resolver::RecipientResolver;
pub use scheduler::MonitorScheduler;
