//! User record parsed from a store document.

use serde::{Deserialize, Serialize};

use chemtrack_core::types::Document;

use crate::error::RecordError;
use crate::fields;

/// Stored field names for user documents.
pub mod field {
    /// Email address.
    pub const EMAIL: &str = "email";
    /// Organization the user belongs to.
    pub const SCHOOL: &str = "school";
    /// Administrator of their own organization.
    pub const IS_ADMIN: &str = "is_admin";
    /// Receives alerts for every organization.
    pub const IS_MASTER: &str = "is_master";
    /// Email opt-in.
    pub const ALLOW_EMAIL: &str = "allow_email";
    /// Push opt-in.
    pub const ALLOW_PUSH: &str = "allow_push";
    /// Device push token.
    pub const PUSH_TOKEN: &str = "expo_push_token";
}

/// The subset of a user account relevant to alert delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Store identifier.
    pub id: String,
    /// Email address; may be empty.
    pub email: String,
    /// Organization; may be empty for global masters.
    pub organization: String,
    /// Administrator of `organization`.
    pub is_org_admin: bool,
    /// Receives alerts for all organizations.
    pub is_global_master: bool,
    /// Email opt-in.
    pub allow_email: bool,
    /// Push opt-in.
    pub allow_push: bool,
    /// Device push token, if registered.
    pub push_token: Option<String>,
}

impl UserRecord {
    /// Whether this user receives alerts for `organization`.
    pub fn is_recipient_for(&self, organization: &str) -> bool {
        (self.is_org_admin && self.organization == organization) || self.is_global_master
    }

    /// Address to email, if the user opted in and has one.
    ///
    /// The stored value is returned verbatim; a blank address counts as none.
    pub fn email_target(&self) -> Option<&str> {
        let email = self.email.as_str();
        (self.allow_email && !email.trim().is_empty()).then_some(email)
    }

    /// Token to push to, if the user opted in and has one.
    pub fn push_target(&self) -> Option<&str> {
        let token = self.push_token.as_deref()?;
        (self.allow_push && !token.trim().is_empty()).then_some(token)
    }
}

impl TryFrom<&Document> for UserRecord {
    type Error = RecordError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: doc.id.clone(),
            email: fields::optional_str(doc, field::EMAIL)?
                .unwrap_or_default()
                .to_string(),
            organization: fields::optional_str(doc, field::SCHOOL)?
                .unwrap_or_default()
                .to_string(),
            is_org_admin: fields::flag(doc, field::IS_ADMIN)?,
            is_global_master: fields::flag(doc, field::IS_MASTER)?,
            allow_email: fields::flag(doc, field::ALLOW_EMAIL)?,
            allow_push: fields::flag(doc, field::ALLOW_PUSH)?,
            push_token: fields::optional_str(doc, field::PUSH_TOKEN)?.map(str::to_string),
        })
    }
}
