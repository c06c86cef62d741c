//! Deduplicated delivery targets for one organization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Email addresses and push tokens entitled to an organization's alerts.
///
/// Entries are unique by value: two users sharing an address receive a
/// single email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientSet {
    /// Email addresses.
    pub emails: BTreeSet<String>,
    /// Device push tokens.
    pub push_tokens: BTreeSet<String>,
}

impl RecipientSet {
    /// Whether there is nobody to notify on any channel.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.push_tokens.is_empty()
    }
}
