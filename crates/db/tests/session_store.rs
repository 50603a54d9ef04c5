use atelier_core::config::{AppConfig, StorageBackend};
use atelier_core::domain::catalog::{AddOnId, Catalog, PackageId};
use atelier_core::domain::form::FormField;
use atelier_core::flows::WizardStep;
use atelier_db::{open_session_repository, QuoteSession};
use tempfile::TempDir;

type SessionStoreTestResult<T = ()> = Result<T, String>;

macro_rules! require_eq {
    ($left:expr, $right:expr, $($arg:tt)*) => {
        if $left != $right {
            return Err(format!($($arg)*));
        }
    };
}

#[tokio::test]
async fn sqlite_session_resumes_across_reopen() -> SessionStoreTestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let mut storage = AppConfig::default().storage;
    storage.backend = StorageBackend::Sqlite;
    storage.url = format!("sqlite://{}", dir.path().join("atelier.db").display());

    {
        let repository = open_session_repository(&storage).await.map_err(|e| e.to_string())?;
        let mut session = QuoteSession::restore(repository, Catalog::standard())
            .await
            .map_err(|e| e.to_string())?;
        session
            .select_package(&PackageId("social-standard".to_string()))
            .await
            .map_err(|e| e.to_string())?;
        session
            .update_field(FormField::BusinessName, "Jua Kali Works")
            .await
            .map_err(|e| e.to_string())?;
        session
            .toggle_add_on(&AddOnId::new("email-marketing"))
            .await
            .map_err(|e| e.to_string())?;
    }

    let repository = open_session_repository(&storage).await.map_err(|e| e.to_string())?;
    let mut session =
        QuoteSession::restore(repository, Catalog::standard()).await.map_err(|e| e.to_string())?;

    let step = session.enter().await.map_err(|e| e.to_string())?;
    require_eq!(step, WizardStep::BusinessInfo, "expected step 1, got {step:?}");
    require_eq!(
        session.state().form_data.business_name.as_deref(),
        Some("Jua Kali Works"),
        "business name should survive reopen"
    );
    require_eq!(
        session.state().form_data.add_ons.len(),
        1,
        "selected add-on should survive reopen"
    );
    Ok(())
}

#[tokio::test]
async fn corrupt_file_store_starts_a_fresh_session() -> SessionStoreTestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{\"state\": 42").map_err(|err| err.to_string())?;

    let mut storage = AppConfig::default().storage;
    storage.backend = StorageBackend::File;
    storage.path = path;

    let repository = open_session_repository(&storage).await.map_err(|e| e.to_string())?;
    let session =
        QuoteSession::restore(repository, Catalog::standard()).await.map_err(|e| e.to_string())?;

    require_eq!(session.state().has_selection(), false, "fresh session has no selection");
    require_eq!(session.state().current_step, 1, "fresh session starts at step 1");
    Ok(())
}
