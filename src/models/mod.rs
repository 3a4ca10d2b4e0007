use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod contact;
mod mood;
mod user;

pub use contact::Contact;
pub use mood::Mood;
pub use user::{User, UserId, USER_ID_LEN, USER_ID_RANGE};

/// A movie a user likes, filed under one genre
///
/// The same title may appear under several genres for one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoviePreference {
    pub genre: String,
    pub movie: String,
}

impl MoviePreference {
    pub fn new(genre: impl Into<String>, movie: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            movie: movie.into(),
        }
    }
}

/// Genre label mapped to the sorted, distinct titles filed under it
pub type Catalog = BTreeMap<String, Vec<String>>;

// ============================================================================
// Match Types
// ============================================================================

/// Successful match between the requesting user and one peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectMatch {
    pub peer_id: UserId,
    /// Titles both users like, in ordinal order
    pub movies: Vec<String>,
}

/// Successful match across a group of contacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMatch {
    /// Titles every participating member likes, in ordinal order
    pub movies: Vec<String>,
    /// Labels of selected members left out for having no preferences
    pub missing_members: Vec<String>,
}

/// One selected contact's snapshot for a group match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub id: UserId,
    pub display_name: String,
    pub preferences: Vec<MoviePreference>,
    /// Loaded for completeness; group matching filters by the requester's mood only
    pub mood: Mood,
}

impl GroupMember {
    /// Display name, or the id when the name is blank
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.display_name
        }
    }
}

/// Result of the most recent match request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MatchOutcome {
    Direct(DirectMatch),
    Group(GroupMatch),
}

impl MatchOutcome {
    pub fn movies(&self) -> &[String] {
        match self {
            MatchOutcome::Direct(m) => &m.movies,
            MatchOutcome::Group(m) => &m.movies,
        }
    }
}
