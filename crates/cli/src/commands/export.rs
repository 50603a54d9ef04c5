use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;

use atelier_core::config::LoadOptions;
use atelier_core::errors::ApplicationError;
use atelier_export::{
    AgencyDetails, DocumentExporter, ExportStatus, ExportTask, TeraDocumentExporter,
};

use crate::commands::{with_session, CommandResult, EXIT_TRANSIENT};

const COMMAND: &str = "export";

pub fn run(options: LoadOptions, dir: Option<PathBuf>) -> CommandResult {
    with_session(COMMAND, options, |session, config| async move {
        let snapshot = match session.snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => return CommandResult::from_application_error(COMMAND, error),
        };
        let exporter = match TeraDocumentExporter::new(
            AgencyDetails::from_config(&config),
            config.export.prefer_pdf,
        ) {
            Ok(exporter) => exporter,
            Err(error) => {
                return CommandResult::from_application_error(COMMAND, ApplicationError::from(error))
            }
        };
        let exporter: Arc<dyn DocumentExporter> = Arc::new(exporter);
        let output_dir = dir.unwrap_or_else(|| config.export.output_dir.clone());

        let task = ExportTask::spawn(exporter, snapshot, output_dir);
        let mut progress = task.subscribe();
        // A closed channel means the task is gone; wait() reports why.
        let _ = progress.wait_for(ExportStatus::is_finished).await;
        let status = task.status();

        match task.wait().await {
            Ok(document) => CommandResult::success_with_data(
                COMMAND,
                format!("quote written to {}", document.path.display()),
                json!({ "export": ExportStatus::Succeeded { document } }),
            ),
            Err(error) => CommandResult::failure_with_data(
                COMMAND,
                "transient",
                format!("the quote document could not be generated ({error})"),
                EXIT_TRANSIENT,
                Some(json!({ "export": status })),
            ),
        }
    })
}
