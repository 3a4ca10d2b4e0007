use rand::Rng;
use std::sync::Arc;

use crate::{
    error::{AccountError, AppResult},
    models::{User, UserId, USER_ID_RANGE},
    stores::{MoodStore, UserStore},
};

/// Shortest accepted username or password
pub const MIN_CREDENTIAL_LEN: usize = 3;

/// Range of the one-time code handed out for password recovery
const RECOVERY_CODE_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;

/// Proof that a recovery code was issued for a user
///
/// The code is shown to the user directly; there is no delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryTicket {
    pub user_id: UserId,
    pub code: String,
}

/// Registration, login and profile edits
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    moods: Arc<dyn MoodStore>,
    max_id_attempts: u32,
}

fn too_short(value: &str) -> bool {
    value.chars().count() < MIN_CREDENTIAL_LEN
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, moods: Arc<dyn MoodStore>, max_id_attempts: u32) -> Self {
        Self {
            users,
            moods,
            max_id_attempts,
        }
    }

    /// Registers a new user under a freshly generated id
    ///
    /// Name and password are trimmed first. Ids are drawn at random from
    /// [`USER_ID_RANGE`] until a free one turns up or the attempt budget is
    /// spent.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<User> {
        let username = username.trim();
        let password = password.trim();

        if too_short(username) || too_short(password) {
            return Err(AccountError::CredentialsTooShort {
                min: MIN_CREDENTIAL_LEN,
            }
            .into());
        }

        if self.users.get_user_by_username(username).await?.is_some() {
            return Err(AccountError::UsernameTaken.into());
        }

        let user_id = self.generate_user_id().await?;
        let user = User {
            user_id,
            username: username.to_string(),
            password: password.to_string(),
        };
        self.users.insert_user(&user).await?;

        tracing::info!(user_id = %user.user_id, "User registered");
        Ok(user)
    }

    async fn generate_user_id(&self) -> AppResult<UserId> {
        for attempt in 1..=self.max_id_attempts {
            let candidate = UserId::from_number(rand::thread_rng().gen_range(USER_ID_RANGE));
            if !self.users.user_exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(attempt, user_id = %candidate, "Generated user id already taken");
        }

        tracing::warn!(attempts = self.max_id_attempts, "User id generation exhausted");
        Err(AccountError::IdSpaceExhausted {
            attempts: self.max_id_attempts,
        }
        .into())
    }

    /// Checks the typed id and password against the stored user
    pub async fn login(&self, raw_user_id: &str, password: &str) -> AppResult<User> {
        if raw_user_id.trim().is_empty() || password.trim().is_empty() {
            return Err(AccountError::MissingCredentials.into());
        }

        let user_id = UserId::parse(raw_user_id).ok_or(AccountError::InvalidIdentifier)?;
        let user = self
            .users
            .get_user_by_id(&user_id)
            .await?
            .ok_or(AccountError::UnknownUserId)?;

        if user.password != password {
            tracing::info!(user_id = %user_id, "Login rejected");
            return Err(AccountError::InvalidCredentials.into());
        }

        tracing::info!(user_id = %user_id, "User logged in");
        Ok(user)
    }

    pub async fn update_username(&self, user_id: &UserId, new_name: &str) -> AppResult<User> {
        let new_name = new_name.trim();
        if too_short(new_name) {
            return Err(AccountError::NameTooShort {
                min: MIN_CREDENTIAL_LEN,
            }
            .into());
        }

        if let Some(holder) = self.users.get_user_by_username(new_name).await? {
            if &holder.user_id != user_id {
                return Err(AccountError::UsernameTaken.into());
            }
        }

        let user = self.require_user(user_id).await?;
        let updated = User {
            username: new_name.to_string(),
            ..user
        };
        self.users.update_user(&updated).await?;

        tracing::info!(user_id = %user_id, "Username updated");
        Ok(updated)
    }

    pub async fn update_password(&self, user_id: &UserId, current: &str, new_password: &str) -> AppResult<User> {
        let user = self.require_user(user_id).await?;

        if current != user.password {
            return Err(AccountError::IncorrectPassword.into());
        }
        if new_password == current {
            return Err(AccountError::PasswordUnchanged.into());
        }
        if too_short(new_password) {
            return Err(AccountError::PasswordTooShort {
                min: MIN_CREDENTIAL_LEN,
            }
            .into());
        }

        let updated = User {
            password: new_password.to_string(),
            ..user
        };
        self.users.update_user(&updated).await?;

        tracing::info!(user_id = %user_id, "Password updated");
        Ok(updated)
    }

    /// Issues a recovery code for the named user
    pub async fn start_recovery(&self, username: &str) -> AppResult<RecoveryTicket> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::UsernameRequired.into());
        }

        let user = self
            .users
            .get_user_by_username(username)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let code = rand::thread_rng().gen_range(RECOVERY_CODE_RANGE).to_string();

        tracing::info!(user_id = %user.user_id, "Recovery code issued");
        Ok(RecoveryTicket {
            user_id: user.user_id,
            code,
        })
    }

    /// Sets a new password once the issued code is presented
    pub async fn reset_password(
        &self,
        ticket: &RecoveryTicket,
        entered_code: &str,
        new_password: &str,
    ) -> AppResult<User> {
        if entered_code.trim() != ticket.code {
            return Err(AccountError::InvalidRecoveryCode.into());
        }
        if too_short(new_password) {
            return Err(AccountError::PasswordTooShort {
                min: MIN_CREDENTIAL_LEN,
            }
            .into());
        }

        let user = self.require_user(&ticket.user_id).await?;
        if user.password == new_password {
            return Err(AccountError::PasswordUnchanged.into());
        }

        let updated = User {
            password: new_password.to_string(),
            ..user
        };
        self.users.update_user(&updated).await?;

        tracing::info!(user_id = %ticket.user_id, "Password reset");
        Ok(updated)
    }

    /// Deletes the account with its preferences, contacts and saved mood
    pub async fn delete_account(&self, user_id: &UserId) -> AppResult<()> {
        self.require_user(user_id).await?;
        self.users.delete_user(user_id).await?;
        self.moods.clear_mood_for_user(user_id).await?;

        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }

    async fn require_user(&self, user_id: &UserId) -> AppResult<User> {
        Ok(self
            .users
            .get_user_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?)
    }
}
