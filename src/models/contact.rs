use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// An entry in a user's contact list
///
/// Ownership is directional: `owner_id` listing `contact_id` says nothing
/// about the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub owner_id: UserId,
    pub contact_id: UserId,
    /// Name chosen by the owner; empty when never set
    pub display_name: String,
    pub added_at: DateTime<Utc>,
}

impl Contact {
    /// Creates a contact with no display name, stamped now
    pub fn new(owner_id: UserId, contact_id: UserId) -> Self {
        Self {
            owner_id,
            contact_id,
            display_name: String::new(),
            added_at: Utc::now(),
        }
    }

    /// Display name, or the contact's id when no name is set
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            self.contact_id.as_str()
        } else {
            &self.display_name
        }
    }
}
