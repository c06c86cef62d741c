//! Recipient resolution for an organization's alerts.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use chemtrack_core::result::AppResult;
use chemtrack_core::traits::RecordStore;
use chemtrack_core::types::{Document, FieldFilter};
use chemtrack_entity::user::model::field;
use chemtrack_entity::{RecipientSet, UserRecord};

/// Computes who receives an organization's alerts.
///
/// Candidates are the organization's admins plus every global master.
/// A user matching both queries is processed once; addresses and tokens
/// are then deduplicated by value.
#[derive(Debug, Clone)]
pub struct RecipientResolver {
    store: Arc<dyn RecordStore>,
    users_collection: String,
}

impl RecipientResolver {
    /// Create a resolver reading users from `users_collection`.
    pub fn new(store: Arc<dyn RecordStore>, users_collection: impl Into<String>) -> Self {
        Self {
            store,
            users_collection: users_collection.into(),
        }
    }

    /// Resolve email and push targets for `organization`.
    ///
    /// Only a failing store query is an error. Malformed user documents are
    /// left out.
    pub async fn resolve(&self, organization: &str) -> AppResult<RecipientSet> {
        let candidates = self.candidates(organization).await?;

        let mut recipients = RecipientSet::default();
        for doc in candidates.values() {
            let user = match UserRecord::try_from(doc) {
                Ok(user) => user,
                Err(e) => {
                    debug!(user_id = %doc.id, "Skipping malformed user: {}", e);
                    continue;
                }
            };

            if !user.is_recipient_for(organization) {
                continue;
            }
            if let Some(email) = user.email_target() {
                recipients.emails.insert(email.to_string());
            }
            if let Some(token) = user.push_target() {
                recipients.push_tokens.insert(token.to_string());
            }
        }

        debug!(
            organization,
            candidates = candidates.len(),
            emails = recipients.emails.len(),
            push_tokens = recipients.push_tokens.len(),
            "Resolved alert recipients"
        );
        Ok(recipients)
    }

    /// Union of org admins and global masters, keyed by document id.
    async fn candidates(&self, organization: &str) -> AppResult<BTreeMap<String, Document>> {
        let queries = [
            vec![
                FieldFilter::eq(field::IS_ADMIN, true),
                FieldFilter::eq(field::SCHOOL, organization),
            ],
            vec![FieldFilter::eq(field::IS_MASTER, true)],
        ];

        let mut candidates = BTreeMap::new();
        for filters in &queries {
            for doc in self.store.query_where(&self.users_collection, filters).await? {
                candidates.entry(doc.id.clone()).or_insert(doc);
            }
        }
        Ok(candidates)
    }
}
