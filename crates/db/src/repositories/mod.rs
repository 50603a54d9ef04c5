use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use atelier_core::domain::quote::QuoteState;
use atelier_core::errors::ApplicationError;

pub mod file;
pub mod memory;
pub mod session;

pub use file::FileSessionRepository;
pub use memory::InMemorySessionRepository;
pub use session::SqlSessionRepository;

/// Key the wizard session is stored under.
pub const STORAGE_KEY: &str = "quote-storage";

/// Envelope version written with every stored session.
pub const RECORD_VERSION: u32 = 0;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        Self::Persistence(value.to_string())
    }
}

/// Stores the single wizard session. Implementations return the default
/// state when nothing has been stored yet.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn load(&self) -> Result<QuoteState, RepositoryError>;
    async fn save(&self, state: &QuoteState) -> Result<(), RepositoryError>;
    async fn clear(&self) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<T: SessionRepository + ?Sized> SessionRepository for Box<T> {
    async fn load(&self) -> Result<QuoteState, RepositoryError> {
        (**self).load().await
    }

    async fn save(&self, state: &QuoteState) -> Result<(), RepositoryError> {
        (**self).save(state).await
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        (**self).clear().await
    }
}

#[async_trait]
impl<T: SessionRepository + ?Sized> SessionRepository for Arc<T> {
    async fn load(&self) -> Result<QuoteState, RepositoryError> {
        (**self).load().await
    }

    async fn save(&self, state: &QuoteState) -> Result<(), RepositoryError> {
        (**self).save(state).await
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        (**self).clear().await
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub state: QuoteState,
    pub version: u32,
}

pub fn encode_record(state: &QuoteState) -> Result<String, RepositoryError> {
    let record = SessionRecord { state: state.clone(), version: RECORD_VERSION };
    serde_json::to_string(&record).map_err(|e| RepositoryError::Decode(e.to_string()))
}

pub fn decode_record(payload: &str) -> Result<QuoteState, RepositoryError> {
    let record: SessionRecord =
        serde_json::from_str(payload).map_err(|e| RepositoryError::Decode(e.to_string()))?;
    if record.version != RECORD_VERSION {
        return Err(RepositoryError::Decode(format!(
            "unsupported session record version {}",
            record.version
        )));
    }
    Ok(record.state)
}
