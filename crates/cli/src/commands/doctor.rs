use std::path::Path;

use serde::Serialize;

use atelier_core::config::{AppConfig, LoadOptions, StorageBackend};
use atelier_db::{open_session_repository, SessionRepository};
use atelier_export::{AgencyDetails, TeraDocumentExporter};

use crate::commands::{CommandResult, EXIT_INTERNAL};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: CheckStatus::Skipped,
            details: "skipped because configuration did not load".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

/// Exit code is 0 when every check passes, 1 otherwise.
pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = u8::from(report.overall_status != CheckStatus::Pass);

    if json_output {
        return match serde_json::to_string_pretty(&report) {
            Ok(output) => CommandResult { exit_code, output },
            Err(error) => CommandResult::failure(
                "doctor",
                "serialization",
                format!("doctor serialization failed: {error}"),
                EXIT_INTERNAL,
            ),
        };
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck::pass("config_validation", "configuration loaded and validated"));
            checks.push(check_session_storage(&config));
            checks.push(check_export_readiness(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            checks.push(DoctorCheck::skipped("session_storage"));
            checks.push(DoctorCheck::skipped("export_readiness"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_session_storage(config: &AppConfig) -> DoctorCheck {
    const NAME: &str = "session_storage";
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck::fail(NAME, format!("failed to initialize async runtime: {error}"))
        }
    };

    let result = runtime.block_on(async {
        let repository = open_session_repository(&config.storage)
            .await
            .map_err(|error| format!("failed to open session store: {error}"))?;
        repository.load().await.map_err(|error| format!("failed to read session: {error}"))?;
        Ok::<(), String>(())
    });

    let location = match config.storage.backend {
        StorageBackend::Sqlite => config.storage.url.clone(),
        StorageBackend::File => config.storage.path.display().to_string(),
        StorageBackend::Memory => "in-memory".to_string(),
    };
    match result {
        Ok(()) => DoctorCheck::pass(
            NAME,
            format!("{} store readable at `{location}`", config.storage.backend.as_str()),
        ),
        Err(error) => DoctorCheck::fail(NAME, error),
    }
}

fn check_export_readiness(config: &AppConfig) -> DoctorCheck {
    const NAME: &str = "export_readiness";
    let exporter =
        match TeraDocumentExporter::new(AgencyDetails::from_config(config), config.export.prefer_pdf)
        {
            Ok(exporter) => exporter,
            Err(error) => return DoctorCheck::fail(NAME, error.to_string()),
        };

    let output_dir = config.export.output_dir.as_path();
    if output_dir.exists() && !output_dir.is_dir() {
        return DoctorCheck::fail(
            NAME,
            format!("export path `{}` exists but is not a directory", output_dir.display()),
        );
    }

    let format = match exporter.converter() {
        Some(converter) => format!("PDF via `{}`", converter.display()),
        None if config.export.prefer_pdf => "HTML (wkhtmltopdf not found on PATH)".to_string(),
        None => "HTML".to_string(),
    };
    DoctorCheck::pass(NAME, format!("{format} into {}", describe_dir(output_dir)))
}

fn describe_dir(path: &Path) -> String {
    if path.is_dir() {
        format!("`{}`", path.display())
    } else {
        format!("`{}` (created on first export)", path.display())
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
