pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod session;
pub mod store;

pub use connection::{connect, connect_with_settings, DbPool};
pub use repositories::{RepositoryError, SessionRepository, STORAGE_KEY};
pub use session::QuoteSession;
pub use store::open_session_repository;
