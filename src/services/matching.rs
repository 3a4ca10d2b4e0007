//! Match engine
//!
//! Pure functions over preference and mood snapshots. Callers load the
//! snapshots from the stores; nothing here touches storage or logs.

use std::collections::BTreeSet;

use crate::error::MatchError;
use crate::models::{DirectMatch, GroupMatch, GroupMember, Mood, MoviePreference, UserId};

/// Everything known about the peer of a direct match
#[derive(Debug, Clone, Copy)]
pub struct PeerSnapshot<'a> {
    /// Peer id as entered by the user, not yet validated
    pub raw_id: &'a str,
    /// Whether the user store knows this id
    pub exists: bool,
    pub preferences: &'a [MoviePreference],
    pub mood: &'a Mood,
}

/// Keeps the preferences whose genre is in `genres`
///
/// An unrestricted mood keeps everything. Relative order is preserved.
pub fn filter_by_genre<'a>(prefs: &'a [MoviePreference], genres: &Mood) -> Vec<&'a MoviePreference> {
    prefs
        .iter()
        .filter(|p| genres.is_unrestricted() || genres.contains(&p.genre))
        .collect()
}

/// Genres both sides agree on
///
/// Both moods set: their intersection. One set: that one. Neither: unrestricted.
pub fn effective_genres(self_mood: &Mood, peer_mood: &Mood) -> Mood {
    match (self_mood.is_unrestricted(), peer_mood.is_unrestricted()) {
        (false, false) => self_mood.intersection(peer_mood),
        (false, true) => self_mood.clone(),
        (true, false) => peer_mood.clone(),
        (true, true) => Mood::new(),
    }
}

/// Distinct titles of the preferences in the given genres, genre discarded
fn titles_in(prefs: &[MoviePreference], genres: &Mood) -> BTreeSet<String> {
    filter_by_genre(prefs, genres)
        .into_iter()
        .map(|p| p.movie.clone())
        .collect()
}

/// Checks a raw peer id against the requesting user
///
/// Blank or wrong-length ids are rejected before the self check.
pub fn validate_peer_id(self_id: &UserId, raw_peer_id: &str) -> Result<UserId, MatchError> {
    let peer_id = UserId::parse(raw_peer_id).ok_or(MatchError::InvalidIdentifier)?;
    if &peer_id == self_id {
        return Err(MatchError::SelfMatchNotAllowed);
    }
    Ok(peer_id)
}

/// Finds the movies the requesting user and one peer both like
///
/// Checks run in a fixed order and the first failure wins: peer id shape,
/// self match, peer existence, own preferences, peer preferences, then mood
/// conflict. Titles are compared without regard to the genre they were filed
/// under once the mood filter has been applied.
pub fn compute_direct_match(
    self_id: &UserId,
    self_prefs: &[MoviePreference],
    self_mood: &Mood,
    peer: PeerSnapshot<'_>,
) -> Result<DirectMatch, MatchError> {
    let peer_id = validate_peer_id(self_id, peer.raw_id)?;

    if !peer.exists {
        return Err(MatchError::PeerNotFound);
    }
    if self_prefs.is_empty() {
        return Err(MatchError::NoOwnPreferences);
    }
    if peer.preferences.is_empty() {
        return Err(MatchError::PeerHasNoPreferences);
    }

    let genres = effective_genres(self_mood, peer.mood);
    if !self_mood.is_unrestricted() && !peer.mood.is_unrestricted() && genres.is_unrestricted() {
        return Err(MatchError::MoodConflict);
    }

    let mine = titles_in(self_prefs, &genres);
    let theirs = titles_in(peer.preferences, &genres);
    let movies: Vec<String> = mine.intersection(&theirs).cloned().collect();

    if movies.is_empty() {
        return Err(MatchError::NoCommonMovies);
    }

    Ok(DirectMatch { peer_id, movies })
}

/// Finds the movies the requesting user and every participating member like
///
/// Members without any preferences are left out of the intersection and
/// reported by label in the result (or in the failure). Every member's list
/// is filtered by the requester's mood only; member moods do not narrow the
/// genres. A member whose preferences all fall outside that mood empties the
/// result rather than being skipped.
pub fn compute_group_match(
    self_prefs: &[MoviePreference],
    self_mood: &Mood,
    members: &[GroupMember],
) -> Result<GroupMatch, MatchError> {
    if self_prefs.is_empty() {
        return Err(MatchError::NoOwnPreferences);
    }

    let (participating, missing): (Vec<&GroupMember>, Vec<&GroupMember>) =
        members.iter().partition(|m| !m.preferences.is_empty());

    if participating.is_empty() {
        return Err(MatchError::NoGroupMemberHasPreferences);
    }

    let missing_members: Vec<String> = missing.iter().map(|m| m.label().to_string()).collect();

    let mut common = titles_in(self_prefs, self_mood);
    for member in participating {
        let theirs = titles_in(&member.preferences, self_mood);
        common.retain(|title| theirs.contains(title));
    }

    if common.is_empty() {
        return Err(MatchError::NoGroupCommonMovies { missing_members });
    }

    Ok(GroupMatch {
        movies: common.into_iter().collect(),
        missing_members,
    })
}
