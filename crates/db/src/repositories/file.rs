use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use atelier_core::domain::quote::QuoteState;

use super::{decode_record, encode_record, RepositoryError, SessionRepository};

/// Keeps the session as a single JSON document on disk.
pub struct FileSessionRepository {
    path: PathBuf,
}

impl FileSessionRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SessionRepository for FileSessionRepository {
    async fn load(&self) -> Result<QuoteState, RepositoryError> {
        match fs::read_to_string(&self.path).await {
            Ok(payload) => decode_record(&payload),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(QuoteState::default()),
            Err(error) => Err(error.into()),
        }
    }

    async fn save(&self, state: &QuoteState) -> Result<(), RepositoryError> {
        let payload = encode_record(state)?;
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        // Staged write, then rename over the target.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
