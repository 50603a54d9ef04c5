use atelier_core::config::{StorageBackend, StorageConfig};

use crate::repositories::{
    FileSessionRepository, InMemorySessionRepository, RepositoryError, SessionRepository,
    SqlSessionRepository,
};
use crate::{connect_with_settings, migrations};

/// Builds the configured session store. The SQLite backend is migrated before use.
pub async fn open_session_repository(
    storage: &StorageConfig,
) -> Result<Box<dyn SessionRepository>, RepositoryError> {
    let repository: Box<dyn SessionRepository> = match storage.backend {
        StorageBackend::Sqlite => {
            let pool =
                connect_with_settings(&storage.url, storage.max_connections, storage.timeout_secs)
                    .await?;
            migrations::run_pending(&pool).await?;
            Box::new(SqlSessionRepository::new(pool))
        }
        StorageBackend::File => Box::new(FileSessionRepository::new(storage.path.clone())),
        StorageBackend::Memory => Box::new(InMemorySessionRepository::default()),
    };

    tracing::debug!(
        event_name = "storage.opened",
        backend = storage.backend.as_str(),
        "session store ready"
    );
    Ok(repository)
}
