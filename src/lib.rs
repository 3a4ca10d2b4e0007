//! Movie preference matching between users and groups of contacts.
//!
//! Users store liked movies per genre and optionally narrow matching to a
//! mood (a set of genres). The engine in [`services::matching`] intersects
//! those snapshots; everything else loads and saves them.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod stores;
pub mod telemetry;

pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
