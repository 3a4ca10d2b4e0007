use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Mood, MoviePreference, UserId},
    stores::{MoodStore, PreferenceStore},
};

/// Per-genre movie picks and the mood selection built on them
#[derive(Clone)]
pub struct PreferenceService {
    preferences: Arc<dyn PreferenceStore>,
    moods: Arc<dyn MoodStore>,
}

impl PreferenceService {
    pub fn new(preferences: Arc<dyn PreferenceStore>, moods: Arc<dyn MoodStore>) -> Self {
        Self { preferences, moods }
    }

    pub async fn preferences_for_user(&self, user_id: &UserId) -> AppResult<Vec<MoviePreference>> {
        self.preferences.get_preferences_for_user(user_id).await
    }

    pub async fn movies_for_genre(&self, user_id: &UserId, genre: &str) -> AppResult<Vec<String>> {
        self.preferences.get_movies_for_genre(user_id, genre).await
    }

    /// Replaces the user's picks under `genre`; an empty list clears the genre
    pub async fn update_genre(&self, user_id: &UserId, genre: &str, movies: &[String]) -> AppResult<()> {
        self.preferences.update_preferences(user_id, genre, movies).await?;
        tracing::info!(user_id = %user_id, genre = %genre, movie_count = movies.len(), "Preferences updated");
        Ok(())
    }

    /// Saves several genres at once, one replacement per genre
    pub async fn save_all<'a, I>(&self, user_id: &UserId, selections: I) -> AppResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        for (genre, movies) in selections {
            self.update_genre(user_id, genre, movies).await?;
        }
        Ok(())
    }

    /// Genres the user has picked anything under, sorted and distinct
    ///
    /// These are the choices offered when selecting a mood.
    pub async fn available_genres(&self, user_id: &UserId) -> AppResult<Vec<String>> {
        let prefs = self.preferences.get_preferences_for_user(user_id).await?;
        let genres: BTreeSet<String> = prefs.into_iter().map(|p| p.genre).collect();
        Ok(genres.into_iter().collect())
    }

    pub async fn mood(&self, user_id: &UserId) -> AppResult<Mood> {
        self.moods.get_mood_for_user(user_id).await
    }

    pub async fn save_mood(&self, user_id: &UserId, mood: &Mood) -> AppResult<()> {
        self.moods.save_mood_for_user(user_id, mood).await?;
        tracing::info!(user_id = %user_id, genre_count = mood.len(), "Mood saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{MockMoodStore, MockPreferenceStore};
    use mockall::predicate::eq;

    fn me() -> UserId {
        UserId::from_number(111111)
    }

    #[tokio::test]
    async fn test_available_genres_sorted_and_distinct() {
        let mut preferences = MockPreferenceStore::new();
        preferences.expect_get_preferences_for_user().returning(|_| {
            Ok(vec![
                MoviePreference::new("Drama", "A"),
                MoviePreference::new("Action", "B"),
                MoviePreference::new("Drama", "C"),
            ])
        });

        let svc = PreferenceService::new(Arc::new(preferences), Arc::new(MockMoodStore::new()));
        let genres = svc.available_genres(&me()).await.unwrap();

        assert_eq!(genres, vec!["Action".to_string(), "Drama".to_string()]);
    }

    #[tokio::test]
    async fn test_save_all_replaces_each_genre() {
        let mut preferences = MockPreferenceStore::new();
        preferences
            .expect_update_preferences()
            .with(eq(me()), eq("Action"), eq(vec!["Heat".to_string()]))
            .times(1)
            .returning(|_, _, _| Ok(()));
        preferences
            .expect_update_preferences()
            .with(eq(me()), eq("Drama"), eq(Vec::<String>::new()))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let svc = PreferenceService::new(Arc::new(preferences), Arc::new(MockMoodStore::new()));
        let action = vec!["Heat".to_string()];
        let drama: Vec<String> = vec![];

        svc.save_all(&me(), [("Action", action.as_slice()), ("Drama", drama.as_slice())])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_save_mood_delegates_to_store() {
        let comedy: Mood = ["Comedy"].into_iter().collect();
        let mut moods = MockMoodStore::new();
        moods
            .expect_save_mood_for_user()
            .with(eq(me()), eq(comedy.clone()))
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = PreferenceService::new(Arc::new(MockPreferenceStore::new()), Arc::new(moods));
        svc.save_mood(&me(), &comedy).await.unwrap();
    }
}
