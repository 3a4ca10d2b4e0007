use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use super::MoodStore;
use crate::{
    db::SettingsKey,
    error::AppResult,
    models::{Mood, UserId},
};

/// Mood selections kept as one Redis set per user
///
/// An empty mood is stored by deleting the key, so a missing key and an
/// unrestricted mood read back the same.
#[derive(Clone)]
pub struct RedisMoodStore {
    redis_client: Client,
}

impl RedisMoodStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait]
impl MoodStore for RedisMoodStore {
    async fn get_mood_for_user(&self, user_id: &UserId) -> AppResult<Mood> {
        let key = SettingsKey::SelectedGenres(user_id.clone()).to_string();
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let genres: Vec<String> = conn.smembers(&key).await.map_err(|e| {
            tracing::warn!(error = %e, user_id = %user_id, "Redis mood read failed");
            e
        })?;

        Ok(genres.into_iter().collect())
    }

    async fn save_mood_for_user(&self, user_id: &UserId, mood: &Mood) -> AppResult<()> {
        let key = SettingsKey::SelectedGenres(user_id.clone()).to_string();
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let mut pipe = redis::pipe();
        pipe.atomic().del(&key).ignore();
        if !mood.is_unrestricted() {
            pipe.sadd(&key, mood.genres().collect::<Vec<_>>()).ignore();
        }

        let _: () = pipe.query_async(&mut conn).await.map_err(|e| {
            tracing::warn!(error = %e, user_id = %user_id, "Redis mood write failed");
            e
        })?;

        tracing::debug!(user_id = %user_id, genre_count = mood.len(), "Mood saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_missing_mood_is_unrestricted() {
        let store = RedisMoodStore::new(create_redis_client(&redis_url()).unwrap());
        let user = UserId::from_number(900001);
        store.clear_mood_for_user(&user).await.unwrap();

        let mood = store.get_mood_for_user(&user).await.unwrap();

        assert!(mood.is_unrestricted());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_save_replaces_previous_mood() {
        let store = RedisMoodStore::new(create_redis_client(&redis_url()).unwrap());
        let user = UserId::from_number(900002);

        let first: Mood = ["Action", "Drama"].into_iter().collect();
        let second: Mood = ["Comedy"].into_iter().collect();
        store.save_mood_for_user(&user, &first).await.unwrap();
        store.save_mood_for_user(&user, &second).await.unwrap();

        assert_eq!(store.get_mood_for_user(&user).await.unwrap(), second);

        store.clear_mood_for_user(&user).await.unwrap();
        assert!(store.get_mood_for_user(&user).await.unwrap().is_unrestricted());
    }
}
