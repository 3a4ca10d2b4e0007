pub mod accounts;
pub mod catalog;
pub mod contacts;
pub mod match_service;
pub mod matching;
pub mod preferences;
pub mod session;

pub use accounts::{AccountService, RecoveryTicket};
pub use contacts::ContactService;
pub use match_service::MatchService;
pub use preferences::PreferenceService;
pub use session::MatchSession;
