use redis::Client;
use std::fmt::Display;

use crate::models::UserId;

/// Keys of per-user entries in the settings store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingsKey {
    SelectedGenres(UserId),
}

impl Display for SettingsKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsKey::SelectedGenres(user_id) => write!(f, "selected_genres:{}", user_id),
        }
    }
}

/// Creates a Redis client for the settings store
///
/// Connections are opened lazily; this only validates the URL.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_key_display_selected_genres() {
        let key = SettingsKey::SelectedGenres(UserId::from_number(424242));
        assert_eq!(format!("{}", key), "selected_genres:424242");
    }

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
    }
}
