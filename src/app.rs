use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    config::Config,
    db,
    models::UserId,
    services::{AccountService, ContactService, MatchService, MatchSession, PreferenceService},
    stores::{MoodStore, RedisMoodStore, SqliteStore},
    telemetry,
};

/// Services wired to their stores
#[derive(Clone)]
pub struct App {
    pub accounts: AccountService,
    pub contacts: ContactService,
    pub preferences: PreferenceService,
    pub matches: MatchService,
}

impl App {
    /// Loads configuration from the environment, installs tracing and
    /// connects
    pub async fn bootstrap() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        telemetry::init_tracing(&config.log_filter);
        Self::connect(&config).await
    }

    /// Opens the SQLite database, applies migrations and connects the
    /// Redis-backed mood store
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
        db::run_migrations(&pool).await?;

        let redis_client = db::create_redis_client(&config.redis_url)?;
        let moods = Arc::new(RedisMoodStore::new(redis_client));

        tracing::info!(database_url = %config.database_url, "Application connected");
        Ok(Self::from_parts(pool, moods, config))
    }

    /// Builds the services over an existing pool and any mood store
    pub fn from_parts(pool: SqlitePool, moods: Arc<dyn MoodStore>, config: &Config) -> Self {
        let store = Arc::new(SqliteStore::new(pool));

        Self {
            accounts: AccountService::new(store.clone(), moods.clone(), config.user_id_max_attempts),
            contacts: ContactService::new(store.clone(), store.clone()),
            preferences: PreferenceService::new(store.clone(), moods.clone()),
            matches: MatchService::new(store.clone(), store.clone(), store, moods),
        }
    }

    /// Opens a match session for a signed-in user
    pub fn session(&self, user_id: UserId) -> MatchSession {
        MatchSession::new(
            user_id,
            self.matches.clone(),
            self.contacts.clone(),
            self.preferences.clone(),
        )
    }
}
