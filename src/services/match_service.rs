use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{DirectMatch, GroupMatch, GroupMember, Mood, UserId},
    services::matching::{self, PeerSnapshot},
    stores::{ContactStore, MoodStore, PreferenceStore, UserStore},
};

/// Loads snapshots from the stores and runs the match engine over them
///
/// Reads happen one after another: the requester first, then the peer or
/// each member in selection order. Nothing is cached between calls.
#[derive(Clone)]
pub struct MatchService {
    users: Arc<dyn UserStore>,
    preferences: Arc<dyn PreferenceStore>,
    contacts: Arc<dyn ContactStore>,
    moods: Arc<dyn MoodStore>,
}

impl MatchService {
    pub fn new(
        users: Arc<dyn UserStore>,
        preferences: Arc<dyn PreferenceStore>,
        contacts: Arc<dyn ContactStore>,
        moods: Arc<dyn MoodStore>,
    ) -> Self {
        Self {
            users,
            preferences,
            contacts,
            moods,
        }
    }

    /// Matches `self_id` against the user whose id was typed as `raw_peer_id`
    ///
    /// `self_mood` is the requester's current selection; the peer's mood is
    /// read from the mood store.
    pub async fn find_direct_match(
        &self,
        self_id: &UserId,
        self_mood: &Mood,
        raw_peer_id: &str,
    ) -> AppResult<DirectMatch> {
        let peer_id = matching::validate_peer_id(self_id, raw_peer_id)?;
        let exists = self.users.user_exists(&peer_id).await?;

        let (self_prefs, peer_prefs, peer_mood) = if exists {
            let self_prefs = self.preferences.get_preferences_for_user(self_id).await?;
            let peer_prefs = self.preferences.get_preferences_for_user(&peer_id).await?;
            let peer_mood = self.moods.get_mood_for_user(&peer_id).await?;
            (self_prefs, peer_prefs, peer_mood)
        } else {
            (Vec::new(), Vec::new(), Mood::new())
        };

        tracing::debug!(
            user_id = %self_id,
            peer_id = %peer_id,
            own_count = self_prefs.len(),
            peer_count = peer_prefs.len(),
            "Computing direct match"
        );

        let result = matching::compute_direct_match(
            self_id,
            &self_prefs,
            self_mood,
            PeerSnapshot {
                raw_id: raw_peer_id,
                exists,
                preferences: &peer_prefs,
                mood: &peer_mood,
            },
        );

        match result {
            Ok(found) => {
                tracing::info!(
                    user_id = %self_id,
                    peer_id = %found.peer_id,
                    movie_count = found.movies.len(),
                    "Direct match found"
                );
                Ok(found)
            }
            Err(e) => {
                tracing::info!(user_id = %self_id, outcome = e.message_id(), "No direct match");
                Err(AppError::Match(e))
            }
        }
    }

    /// Matches `self_id` against every selected contact at once
    ///
    /// Member labels come from the requester's contact list.
    pub async fn find_group_match(
        &self,
        self_id: &UserId,
        self_mood: &Mood,
        selected: &[UserId],
    ) -> AppResult<GroupMatch> {
        let self_prefs = self.preferences.get_preferences_for_user(self_id).await?;
        let contacts = self.contacts.get_contacts_for_user(self_id).await?;

        let mut members = Vec::with_capacity(selected.len());
        for id in selected {
            let preferences = self.preferences.get_preferences_for_user(id).await?;
            let mood = if preferences.is_empty() {
                Mood::new()
            } else {
                self.moods.get_mood_for_user(id).await?
            };
            let display_name = contacts
                .iter()
                .find(|c| &c.contact_id == id)
                .map(|c| c.display_name.clone())
                .unwrap_or_default();

            members.push(GroupMember {
                id: id.clone(),
                display_name,
                preferences,
                mood,
            });
        }

        match matching::compute_group_match(&self_prefs, self_mood, &members) {
            Ok(found) => {
                tracing::info!(
                    user_id = %self_id,
                    group_size = selected.len(),
                    missing = found.missing_members.len(),
                    movie_count = found.movies.len(),
                    "Group match found"
                );
                Ok(found)
            }
            Err(e) => {
                tracing::info!(
                    user_id = %self_id,
                    group_size = selected.len(),
                    outcome = e.message_id(),
                    "No group match"
                );
                Err(AppError::Match(e))
            }
        }
    }
}
