//! Derived alert values. None of these are persisted.

pub mod condition;
pub mod message;
pub mod recipient;

pub use condition::{AlertCondition, AlertKind};
pub use message::AlertMessage;
pub use recipient::RecipientSet;
