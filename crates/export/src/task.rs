use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use atelier_core::snapshot::QuoteSnapshot;

use crate::document::{DocumentExporter, ExportError, ExportedDocument};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportStatus {
    Generating,
    Succeeded { document: ExportedDocument },
    Failed { reason: String },
}

impl ExportStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Generating)
    }
}

/// A document export running on its own task. The wizard state is never
/// touched; a failed export is reported once and not retried.
pub struct ExportTask {
    status: watch::Receiver<ExportStatus>,
    handle: JoinHandle<Result<ExportedDocument, ExportError>>,
}

impl ExportTask {
    pub fn spawn(
        exporter: Arc<dyn DocumentExporter>,
        snapshot: QuoteSnapshot,
        output_dir: PathBuf,
    ) -> Self {
        let (sender, status) = watch::channel(ExportStatus::Generating);
        tracing::info!(
            event_name = "export.started",
            quote_id = %snapshot.quote_id,
            "quote export started"
        );

        let handle = tokio::spawn(async move {
            let result = exporter.export(&snapshot, &output_dir).await;
            let status = match &result {
                Ok(document) => ExportStatus::Succeeded { document: document.clone() },
                Err(error) => {
                    tracing::warn!(
                        event_name = "export.failed",
                        quote_id = %snapshot.quote_id,
                        error = %error,
                        "quote export failed"
                    );
                    ExportStatus::Failed { reason: error.to_string() }
                }
            };
            // Nobody may be watching any more; the join handle still carries the result.
            let _ = sender.send(status);
            result
        });

        Self { status, handle }
    }

    pub fn status(&self) -> ExportStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExportStatus> {
        self.status.clone()
    }

    pub async fn wait(self) -> Result<ExportedDocument, ExportError> {
        self.handle.await.map_err(|error| ExportError::Task(error.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tempfile::TempDir;
    use tokio::sync::Notify;

    use atelier_core::domain::catalog::{Catalog, PackageId};
    use atelier_core::domain::quote::QuoteState;
    use atelier_core::snapshot::QuoteSnapshot;

    use super::{ExportStatus, ExportTask};
    use crate::document::{DocumentExporter, ExportError, ExportFormat, ExportedDocument};

    fn snapshot() -> QuoteSnapshot {
        let catalog = Catalog::standard();
        let (service, package) =
            catalog.find_package(&PackageId("bundle-standard".to_string())).expect("package");
        let mut state = QuoteState::default();
        state.set_selected_service(service.clone());
        state.set_selected_package(package.clone());
        state.generate_quote();
        QuoteSnapshot::capture(&state, &catalog).expect("snapshot")
    }

    /// Holds the export until released so the in-flight status can be observed.
    struct GatedExporter {
        gate: Arc<Notify>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentExporter for GatedExporter {
        async fn export(
            &self,
            snapshot: &QuoteSnapshot,
            output_dir: &Path,
        ) -> Result<ExportedDocument, ExportError> {
            self.gate.notified().await;
            if self.fail {
                return Err(ExportError::Conversion("renderer crashed".to_string()));
            }
            Ok(ExportedDocument {
                path: output_dir.join(snapshot.file_name("html")),
                format: ExportFormat::Html,
                bytes: 0,
            })
        }
    }

    #[tokio::test]
    async fn status_moves_from_generating_to_succeeded() {
        let dir = TempDir::new().expect("tempdir");
        let gate = Arc::new(Notify::new());
        let exporter = Arc::new(GatedExporter { gate: gate.clone(), fail: false });
        let snapshot = snapshot();
        let expected = dir.path().join(format!("quote-{}.html", snapshot.quote_id));

        let task = ExportTask::spawn(exporter, snapshot, dir.path().to_path_buf());
        let mut updates = task.subscribe();
        assert_eq!(task.status(), ExportStatus::Generating);

        gate.notify_one();
        updates.changed().await.expect("status update");

        assert!(matches!(
            task.status(),
            ExportStatus::Succeeded { ref document } if document.path == expected
        ));
        assert_eq!(task.wait().await.expect("wait").path, expected);
    }

    #[tokio::test]
    async fn failure_is_reported_without_retry() {
        let dir = TempDir::new().expect("tempdir");
        let gate = Arc::new(Notify::new());
        let exporter = Arc::new(GatedExporter { gate: gate.clone(), fail: true });

        let task = ExportTask::spawn(exporter, snapshot(), dir.path().to_path_buf());
        let mut updates = task.subscribe();
        gate.notify_one();
        updates.changed().await.expect("status update");

        let status = task.status();
        assert!(status.is_finished());
        assert_eq!(
            status,
            ExportStatus::Failed { reason: "conversion error: renderer crashed".to_string() }
        );
        assert!(matches!(task.wait().await, Err(ExportError::Conversion(_))));
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_value(ExportStatus::Generating).expect("json");
        assert_eq!(json["status"], "generating");
    }
}
