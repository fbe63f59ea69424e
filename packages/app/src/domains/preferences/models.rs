//! Wire model for per-user preference documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{EventId, ResourceId};

/// Collection holding one preference document per user; the document id is
/// the auth-provider user id.
pub const USERS_COLLECTION: &str = "users";

/// The user's preference document as stored remotely.
///
/// Transport form uses ordered lists; set semantics are enforced by the
/// in-memory representation in the service. Every field defaults when absent
/// so partially-written documents always decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDocument {
    pub email: String,
    pub saved_items: Vec<ResourceId>,
    pub user_events: Vec<EventId>,
    /// Written once when the document is first created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserDocument {
    /// A fresh document for a newly seen user.
    pub fn fresh(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            saved_items: Vec::new(),
            user_events: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }
}
