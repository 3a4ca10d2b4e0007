use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult, ContactError, MatchError},
    models::{Contact, MatchOutcome, Mood, UserId},
    services::{ContactService, MatchService, PreferenceService},
};

/// Latest outcome of a match request
pub type MatchSlot = Option<Result<MatchOutcome, MatchError>>;

#[derive(Default)]
struct SessionState {
    peer_input: String,
    mood: Mood,
    result: MatchSlot,
}

/// Match screen state for one signed-in user
///
/// Each request writes its outcome into a single slot, so a later request
/// simply replaces whatever an earlier one left there. Storage faults are
/// returned to the caller and leave the slot untouched.
#[derive(Clone)]
pub struct MatchSession {
    user_id: UserId,
    matches: MatchService,
    contacts: ContactService,
    preferences: PreferenceService,
    state: Arc<RwLock<SessionState>>,
}

impl MatchSession {
    pub fn new(
        user_id: UserId,
        matches: MatchService,
        contacts: ContactService,
        preferences: PreferenceService,
    ) -> Self {
        Self {
            user_id,
            matches,
            contacts,
            preferences,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub async fn set_peer_input(&self, raw: &str) {
        self.state.write().await.peer_input = raw.to_string();
    }

    pub async fn mood(&self) -> Mood {
        self.state.read().await.mood.clone()
    }

    pub async fn set_mood(&self, mood: Mood) {
        self.state.write().await.mood = mood;
    }

    pub async fn toggle_genre(&self, genre: &str) {
        self.state.write().await.mood.toggle(genre);
    }

    /// Genres the user can choose a mood from
    pub async fn available_genres(&self) -> AppResult<Vec<String>> {
        self.preferences.available_genres(&self.user_id).await
    }

    /// Replaces the selection with the saved mood
    pub async fn load_mood(&self) -> AppResult<Mood> {
        let saved = self.preferences.mood(&self.user_id).await?;
        self.state.write().await.mood = saved.clone();
        Ok(saved)
    }

    /// Persists the current selection so peers see it
    pub async fn save_mood(&self) -> AppResult<()> {
        let mood = self.mood().await;
        self.preferences.save_mood(&self.user_id, &mood).await
    }

    pub async fn result(&self) -> MatchSlot {
        self.state.read().await.result.clone()
    }

    pub async fn reset_result(&self) {
        self.state.write().await.result = None;
    }

    /// Matches against the id currently typed in
    pub async fn find_direct_match(&self) -> AppResult<MatchOutcome> {
        let (peer_input, mood) = {
            let state = self.state.read().await;
            (state.peer_input.clone(), state.mood.clone())
        };

        let result = self
            .matches
            .find_direct_match(&self.user_id, &mood, &peer_input)
            .await
            .map(MatchOutcome::Direct);
        self.record(result).await
    }

    /// Matches against the selected contacts
    pub async fn find_group_match(&self, selected: &[UserId]) -> AppResult<MatchOutcome> {
        let mood = self.mood().await;

        let result = self
            .matches
            .find_group_match(&self.user_id, &mood, selected)
            .await
            .map(MatchOutcome::Group);
        self.record(result).await
    }

    /// Adds the peer from the current direct match to the contact list
    pub async fn add_matched_peer(&self) -> AppResult<Contact> {
        let peer_id = match self.result().await {
            Some(Ok(MatchOutcome::Direct(found))) => found.peer_id,
            _ => return Err(ContactError::NoMatchedPeer.into()),
        };
        self.contacts.add_matched_peer(&self.user_id, &peer_id).await
    }

    async fn record(&self, result: AppResult<MatchOutcome>) -> AppResult<MatchOutcome> {
        let slot = match &result {
            Ok(outcome) => Some(Ok(outcome.clone())),
            Err(AppError::Match(e)) => Some(Err(e.clone())),
            Err(_) => None,
        };
        if let Some(slot) = slot {
            self.state.write().await.result = Some(slot);
        }
        result
    }
}
