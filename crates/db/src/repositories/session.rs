use chrono::Utc;
use sqlx::Row;

use atelier_core::domain::quote::QuoteState;

use super::{decode_record, encode_record, RepositoryError, SessionRepository, STORAGE_KEY};
use crate::DbPool;

/// Keeps the session as one JSON row in `session_store`.
pub struct SqlSessionRepository {
    pool: DbPool,
    storage_key: String,
}

impl SqlSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self::with_key(pool, STORAGE_KEY)
    }

    pub fn with_key(pool: DbPool, storage_key: impl Into<String>) -> Self {
        Self { pool, storage_key: storage_key.into() }
    }
}

#[async_trait::async_trait]
impl SessionRepository for SqlSessionRepository {
    async fn load(&self) -> Result<QuoteState, RepositoryError> {
        let row = sqlx::query("SELECT payload FROM session_store WHERE storage_key = ?")
            .bind(&self.storage_key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => {
                let payload: String =
                    r.try_get("payload").map_err(|e| RepositoryError::Decode(e.to_string()))?;
                decode_record(&payload)
            }
            None => Ok(QuoteState::default()),
        }
    }

    async fn save(&self, state: &QuoteState) -> Result<(), RepositoryError> {
        let payload = encode_record(state)?;

        sqlx::query(
            "INSERT INTO session_store (storage_key, payload, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(storage_key) DO UPDATE SET
                 payload = excluded.payload,
                 updated_at = excluded.updated_at",
        )
        .bind(&self.storage_key)
        .bind(&payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM session_store WHERE storage_key = ?")
            .bind(&self.storage_key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use atelier_core::domain::catalog::{Catalog, PackageId};
    use atelier_core::domain::form::{FormField, FormUpdate};
    use atelier_core::domain::quote::QuoteState;

    use super::SqlSessionRepository;
    use crate::repositories::{RepositoryError, SessionRepository};
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn answered_state() -> QuoteState {
        let catalog = Catalog::standard();
        let (service, package) =
            catalog.find_package(&PackageId("social-premium".to_string())).expect("package");
        let mut state = QuoteState::default();
        state.set_selected_service(service.clone());
        state.set_selected_package(package.clone());
        state.update_form_data(
            FormUpdate::parse(FormField::BusinessName, "Baraka Bakery").expect("parse"),
        );
        state.set_current_step(2);
        state
    }

    #[tokio::test]
    async fn empty_store_loads_default_state() {
        let repo = SqlSessionRepository::new(setup().await);
        assert_eq!(repo.load().await.expect("load"), QuoteState::default());
    }

    #[tokio::test]
    async fn save_then_load_restores_state() {
        let repo = SqlSessionRepository::new(setup().await);
        let state = answered_state();

        repo.save(&state).await.expect("save");
        assert_eq!(repo.load().await.expect("load"), state);
    }

    #[tokio::test]
    async fn repeated_saves_keep_a_single_row() {
        let pool = setup().await;
        let repo = SqlSessionRepository::new(pool.clone());
        let mut state = answered_state();

        repo.save(&state).await.expect("first save");
        state.set_current_step(3);
        repo.save(&state).await.expect("second save");

        let count = sqlx::query("SELECT COUNT(*) AS count FROM session_store")
            .fetch_one(&pool)
            .await
            .expect("count")
            .get::<i64, _>("count");
        assert_eq!(count, 1);
        assert_eq!(repo.load().await.expect("load").current_step, 3);
    }

    #[tokio::test]
    async fn clear_removes_stored_session() {
        let repo = SqlSessionRepository::new(setup().await);
        repo.save(&answered_state()).await.expect("save");

        repo.clear().await.expect("clear");

        assert_eq!(repo.load().await.expect("load"), QuoteState::default());
    }

    #[tokio::test]
    async fn corrupt_payload_is_reported() {
        let pool = setup().await;
        sqlx::query(
            "INSERT INTO session_store (storage_key, payload, updated_at) VALUES (?, ?, ?)",
        )
        .bind("quote-storage")
        .bind("not json")
        .bind("2026-01-01T00:00:00Z")
        .execute(&pool)
        .await
        .expect("insert");

        let repo = SqlSessionRepository::new(pool);
        assert!(matches!(repo.load().await, Err(RepositoryError::Decode(_))));
    }
}
