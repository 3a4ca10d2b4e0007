//! Storage collaborators of the match engine
//!
//! Every call takes the user id as an explicit partition key. Services hold
//! these as trait objects so the SQLite, Redis and in-memory backends are
//! interchangeable.

use crate::{
    error::AppResult,
    models::{Contact, Mood, MoviePreference, User, UserId},
};

pub mod memory;
pub mod redis_mood;
pub mod sqlite;

pub use memory::MemoryMoodStore;
pub use redis_mood::RedisMoodStore;
pub use sqlite::SqliteStore;

/// Registered users
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn user_exists(&self, id: &UserId) -> AppResult<bool> {
        Ok(self.get_user_by_id(id).await?.is_some())
    }

    async fn insert_user(&self, user: &User) -> AppResult<()>;

    async fn update_user(&self, user: &User) -> AppResult<()>;

    /// Removes the user together with their preferences and every contact
    /// row that mentions them
    async fn delete_user(&self, id: &UserId) -> AppResult<()>;
}

/// Per-genre movie preferences
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_preferences_for_user(&self, user_id: &UserId) -> AppResult<Vec<MoviePreference>>;

    async fn get_movies_for_genre(&self, user_id: &UserId, genre: &str) -> AppResult<Vec<String>>;

    /// Replaces every movie the user has under `genre`
    async fn update_preferences(&self, user_id: &UserId, genre: &str, movies: &[String]) -> AppResult<()>;
}

/// Directional contact lists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContactStore: Send + Sync {
    /// Contacts of `owner_id`, most recently added first
    async fn get_contacts_for_user(&self, owner_id: &UserId) -> AppResult<Vec<Contact>>;

    async fn get_contact(&self, owner_id: &UserId, contact_id: &UserId) -> AppResult<Option<Contact>>;

    /// Inserts the contact; an existing (owner, contact) pair is left untouched
    async fn add_contact(&self, contact: &Contact) -> AppResult<()>;

    async fn update_contact(&self, contact: &Contact) -> AppResult<()>;

    async fn delete_contact(&self, owner_id: &UserId, contact_id: &UserId) -> AppResult<()>;
}

/// Selected genres per user
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MoodStore: Send + Sync {
    /// The saved mood, or an unrestricted one when nothing is saved
    async fn get_mood_for_user(&self, user_id: &UserId) -> AppResult<Mood>;

    async fn save_mood_for_user(&self, user_id: &UserId, mood: &Mood) -> AppResult<()>;

    async fn clear_mood_for_user(&self, user_id: &UserId) -> AppResult<()> {
        self.save_mood_for_user(user_id, &Mood::new()).await
    }
}
