use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Number of characters in every user id
pub const USER_ID_LEN: usize = 6;

/// Lowest and highest numeric value of a generated user id
pub const USER_ID_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

/// Identifier assigned to a user at registration (e.g. "482913")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parses user input into an id
    ///
    /// Surrounding whitespace is ignored. Returns `None` when the remaining
    /// text is blank or not exactly [`USER_ID_LEN`] characters long.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() != USER_ID_LEN {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Builds the id for a generated number
    pub fn from_number(n: u32) -> Self {
        Self(n.to_string())
    }

    /// Wraps an id read back from storage without validating it
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered user
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    /// Login and display name, unique across all users
    pub username: String,
    /// Stored as entered; compared verbatim at login
    pub password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
