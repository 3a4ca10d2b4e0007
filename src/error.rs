/// Expected outcomes of a match request that produce no match
///
/// None of these are faults: each one maps to a message the caller shows to
/// the user (see [`MatchError::message_id`]).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Peer id is blank or malformed")]
    InvalidIdentifier,

    #[error("Cannot match with yourself")]
    SelfMatchNotAllowed,

    #[error("Peer not found")]
    PeerNotFound,

    #[error("You have no movie preferences")]
    NoOwnPreferences,

    #[error("Peer has no movie preferences")]
    PeerHasNoPreferences,

    #[error("No group member has movie preferences")]
    NoGroupMemberHasPreferences,

    #[error("Selected moods have no genre in common")]
    MoodConflict,

    #[error("No common movies")]
    NoCommonMovies,

    #[error("No movies common to the whole group")]
    NoGroupCommonMovies {
        /// Members skipped because they have no preferences
        missing_members: Vec<String>,
    },
}

impl MatchError {
    /// Stable identifier of the user-facing message for this outcome
    pub fn message_id(&self) -> &'static str {
        match self {
            MatchError::InvalidIdentifier => "invalid_user_id",
            MatchError::SelfMatchNotAllowed => "cannot_match_self",
            MatchError::PeerNotFound => "not_found",
            MatchError::NoOwnPreferences => "no_preferences",
            MatchError::PeerHasNoPreferences => "other_user_no_preferences",
            MatchError::NoGroupMemberHasPreferences => "no_contacts_have_preferences",
            MatchError::MoodConflict => "no_genre_match",
            MatchError::NoCommonMovies => "no_common_movies",
            MatchError::NoGroupCommonMovies { .. } => "no_group_match",
        }
    }
}

/// Expected outcomes of contact-list operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Contact id is blank or malformed")]
    InvalidIdentifier,

    #[error("Cannot add yourself as a contact")]
    SelfContactNotAllowed,

    #[error("Contact already exists")]
    ContactAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Contact not found")]
    ContactNotFound,

    #[error("No matched user to add")]
    NoMatchedPeer,
}

impl ContactError {
    pub fn message_id(&self) -> &'static str {
        match self {
            ContactError::InvalidIdentifier => "invalid_user_id",
            ContactError::SelfContactNotAllowed => "cannot_add_self",
            ContactError::ContactAlreadyExists => "contact_exists",
            ContactError::UserNotFound => "not_found",
            ContactError::ContactNotFound => "contact_not_found",
            ContactError::NoMatchedPeer => "no_matched_user",
        }
    }
}

/// Expected outcomes of registration, login and profile edits
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Name and password must be at least {min} characters")]
    CredentialsTooShort { min: usize },

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("User id and password are required")]
    MissingCredentials,

    #[error("User id is malformed")]
    InvalidIdentifier,

    #[error("User not found")]
    UserNotFound,

    #[error("No user with this id")]
    UnknownUserId,

    #[error("Wrong password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("New password must differ from the current one")]
    PasswordUnchanged,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Username must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("Username is required")]
    UsernameRequired,

    #[error("Recovery code does not match")]
    InvalidRecoveryCode,

    #[error("No free user id found after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },
}

impl AccountError {
    pub fn message_id(&self) -> &'static str {
        match self {
            AccountError::CredentialsTooShort { .. } => "min_length_error",
            AccountError::UsernameTaken => "name_exists",
            AccountError::MissingCredentials => "fill_in_login_details",
            AccountError::InvalidIdentifier => "invalid_user_id",
            AccountError::UserNotFound => "user_not_found",
            AccountError::UnknownUserId => "not_found",
            AccountError::InvalidCredentials => "invalid_login",
            AccountError::IncorrectPassword => "incorrect_password",
            AccountError::PasswordUnchanged => "same_password",
            AccountError::PasswordTooShort { .. } => "password_too_short",
            AccountError::NameTooShort { .. } => "name_too_short",
            AccountError::UsernameRequired => "username_required",
            AccountError::InvalidRecoveryCode => "invalid_code",
            AccountError::IdSpaceExhausted { .. } => "registration_unavailable",
        }
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Settings store error: {0}")]
    Settings(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message identifier to surface to the user
    ///
    /// Storage faults all collapse into `internal_error`.
    pub fn message_id(&self) -> &'static str {
        match self {
            AppError::Match(e) => e.message_id(),
            AppError::Contact(e) => e.message_id(),
            AppError::Account(e) => e.message_id(),
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Settings(_)
            | AppError::Serialization(_)
            | AppError::Io(_)
            | AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether this is an expected user-facing outcome rather than a fault
    pub fn is_outcome(&self) -> bool {
        matches!(
            self,
            AppError::Match(_) | AppError::Contact(_) | AppError::Account(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
