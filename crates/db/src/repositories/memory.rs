use tokio::sync::RwLock;

use atelier_core::domain::quote::QuoteState;

use super::{RepositoryError, SessionRepository};

#[derive(Default)]
pub struct InMemorySessionRepository {
    state: RwLock<Option<QuoteState>>,
}

impl InMemorySessionRepository {
    pub fn with_state(state: QuoteState) -> Self {
        Self { state: RwLock::new(Some(state)) }
    }
}

#[async_trait::async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(&self) -> Result<QuoteState, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.clone().unwrap_or_default())
    }

    async fn save(&self, state: &QuoteState) -> Result<(), RepositoryError> {
        let mut stored = self.state.write().await;
        *stored = Some(state.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        let mut stored = self.state.write().await;
        *stored = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use atelier_core::domain::quote::QuoteState;

    use super::InMemorySessionRepository;
    use crate::repositories::SessionRepository;

    #[tokio::test]
    async fn in_memory_store_round_trips_and_clears() {
        let repo = InMemorySessionRepository::default();
        let mut state = QuoteState::default();
        state.set_current_step(5);

        repo.save(&state).await.expect("save");
        assert_eq!(repo.load().await.expect("load"), state);

        repo.clear().await.expect("clear");
        assert_eq!(repo.load().await.expect("load"), QuoteState::default());
    }
}
