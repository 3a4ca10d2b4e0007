pub mod redis;
pub mod sqlite;

pub use self::redis::{create_redis_client, SettingsKey};
pub use self::sqlite::{create_pool, run_migrations};
