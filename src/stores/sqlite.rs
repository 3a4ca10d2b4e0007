use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::collections::BTreeSet;

use super::{ContactStore, PreferenceStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{Contact, MoviePreference, User, UserId},
};

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: String,
    username: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: UserId::from_stored(row.user_id),
            username: row.username,
            password: row.password,
        }
    }
}

#[derive(Debug, FromRow)]
struct PreferenceRow {
    genre: String,
    movie: String,
}

impl From<PreferenceRow> for MoviePreference {
    fn from(row: PreferenceRow) -> Self {
        MoviePreference {
            genre: row.genre,
            movie: row.movie,
        }
    }
}

#[derive(Debug, FromRow)]
struct ContactRow {
    owner_id: String,
    contact_id: String,
    display_name: String,
    added_at_ms: i64,
}

impl TryFrom<ContactRow> for Contact {
    type Error = AppError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let added_at = DateTime::<Utc>::from_timestamp_millis(row.added_at_ms).ok_or_else(|| {
            AppError::Internal(format!("Contact timestamp out of range: {}", row.added_at_ms))
        })?;

        Ok(Contact {
            owner_id: UserId::from_stored(row.owner_id),
            contact_id: UserId::from_stored(row.contact_id),
            display_name: row.display_name,
            added_at,
        })
    }
}

/// Users, preferences and contacts in one SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn get_user_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, username, password FROM users WHERE user_id = ? LIMIT 1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, username, password FROM users WHERE username = ? LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn user_exists(&self, id: &UserId) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE user_id = ? LIMIT 1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        sqlx::query("INSERT INTO users (user_id, username, password) VALUES (?, ?, ?)")
            .bind(user.user_id.as_str())
            .bind(&user.username)
            .bind(&user.password)
            .execute(&self.pool)
            .await?;

        tracing::debug!(user_id = %user.user_id, "User inserted");
        Ok(())
    }

    async fn update_user(&self, user: &User) -> AppResult<()> {
        sqlx::query("UPDATE users SET username = ?, password = ? WHERE user_id = ?")
            .bind(&user.username)
            .bind(&user.password)
            .bind(user.user_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM movie_preferences WHERE user_id = ?")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        let contacts = sqlx::query("DELETE FROM contacts WHERE owner_id = ? OR contact_id = ?")
            .bind(id.as_str())
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id = %id,
            contacts_removed = contacts.rows_affected(),
            "User deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for SqliteStore {
    async fn get_preferences_for_user(&self, user_id: &UserId) -> AppResult<Vec<MoviePreference>> {
        let rows = sqlx::query_as::<_, PreferenceRow>(
            "SELECT genre, movie FROM movie_preferences WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MoviePreference::from).collect())
    }

    async fn get_movies_for_genre(&self, user_id: &UserId, genre: &str) -> AppResult<Vec<String>> {
        let movies = sqlx::query_scalar::<_, String>(
            "SELECT movie FROM movie_preferences WHERE user_id = ? AND genre = ? ORDER BY id",
        )
        .bind(user_id.as_str())
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn update_preferences(&self, user_id: &UserId, genre: &str, movies: &[String]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM movie_preferences WHERE user_id = ? AND genre = ?")
            .bind(user_id.as_str())
            .bind(genre)
            .execute(&mut *tx)
            .await?;

        let mut seen = BTreeSet::new();
        for movie in movies.iter().filter(|m| seen.insert(m.as_str())) {
            sqlx::query("INSERT INTO movie_preferences (user_id, genre, movie) VALUES (?, ?, ?)")
                .bind(user_id.as_str())
                .bind(genre)
                .bind(movie)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            user_id = %user_id,
            genre = %genre,
            movie_count = seen.len(),
            "Genre preferences replaced"
        );
        Ok(())
    }
}

#[async_trait]
impl ContactStore for SqliteStore {
    async fn get_contacts_for_user(&self, owner_id: &UserId) -> AppResult<Vec<Contact>> {
        let rows = sqlx::query_as::<_, ContactRow>(
            "SELECT owner_id, contact_id, display_name, added_at_ms FROM contacts \
             WHERE owner_id = ? ORDER BY added_at_ms DESC, contact_id",
        )
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Contact::try_from).collect()
    }

    async fn get_contact(&self, owner_id: &UserId, contact_id: &UserId) -> AppResult<Option<Contact>> {
        let row = sqlx::query_as::<_, ContactRow>(
            "SELECT owner_id, contact_id, display_name, added_at_ms FROM contacts \
             WHERE owner_id = ? AND contact_id = ? LIMIT 1",
        )
        .bind(owner_id.as_str())
        .bind(contact_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Contact::try_from).transpose()
    }

    async fn add_contact(&self, contact: &Contact) -> AppResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO contacts (owner_id, contact_id, display_name, added_at_ms) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(contact.owner_id.as_str())
        .bind(contact.contact_id.as_str())
        .bind(&contact.display_name)
        .bind(contact.added_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_contact(&self, contact: &Contact) -> AppResult<()> {
        sqlx::query("UPDATE contacts SET display_name = ? WHERE owner_id = ? AND contact_id = ?")
            .bind(&contact.display_name)
            .bind(contact.owner_id.as_str())
            .bind(contact.contact_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_contact(&self, owner_id: &UserId, contact_id: &UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM contacts WHERE owner_id = ? AND contact_id = ?")
            .bind(owner_id.as_str())
            .bind(contact_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
