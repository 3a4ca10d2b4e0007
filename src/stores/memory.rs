use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::MoodStore;
use crate::{
    error::AppResult,
    models::{Mood, UserId},
};

/// Mood selections held in process memory
#[derive(Clone, Default)]
pub struct MemoryMoodStore {
    inner: Arc<RwLock<HashMap<UserId, Mood>>>,
}

impl MemoryMoodStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MoodStore for MemoryMoodStore {
    async fn get_mood_for_user(&self, user_id: &UserId) -> AppResult<Mood> {
        let inner = self.inner.read().await;
        Ok(inner.get(user_id).cloned().unwrap_or_default())
    }

    async fn save_mood_for_user(&self, user_id: &UserId, mood: &Mood) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if mood.is_unrestricted() {
            inner.remove(user_id);
        } else {
            inner.insert(user_id.clone(), mood.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_is_unrestricted() {
        let store = MemoryMoodStore::new();
        let mood = store.get_mood_for_user(&UserId::from_number(123456)).await.unwrap();
        assert!(mood.is_unrestricted());
    }

    #[tokio::test]
    async fn test_moods_are_partitioned_by_user() {
        let store = MemoryMoodStore::new();
        let ann = UserId::from_number(111111);
        let bob = UserId::from_number(222222);
        let action: Mood = ["Action"].into_iter().collect();

        store.save_mood_for_user(&ann, &action).await.unwrap();

        assert_eq!(store.get_mood_for_user(&ann).await.unwrap(), action);
        assert!(store.get_mood_for_user(&bob).await.unwrap().is_unrestricted());
    }

    #[tokio::test]
    async fn test_clear_mood() {
        let store = MemoryMoodStore::new();
        let ann = UserId::from_number(111111);
        let action: Mood = ["Action"].into_iter().collect();

        store.save_mood_for_user(&ann, &action).await.unwrap();
        store.clear_mood_for_user(&ann).await.unwrap();

        assert!(store.get_mood_for_user(&ann).await.unwrap().is_unrestricted());
    }
}
