pub mod config;
pub mod contact;
pub mod doctor;
pub mod export;
pub mod quote;
pub mod services;
pub mod wizard;

use std::future::Future;

use serde::Serialize;
use serde_json::Value;

use atelier_core::config::{AppConfig, LoadOptions};
use atelier_core::domain::catalog::Catalog;
use atelier_core::errors::{ApplicationError, InterfaceError};
use atelier_db::{open_session_repository, QuoteSession, SessionRepository};

pub type Session = QuoteSession<Box<dyn SessionRepository>>;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_STORAGE: u8 = 4;
pub const EXIT_VALIDATION: u8 = 5;
pub const EXIT_PRECONDITION: u8 = 6;
pub const EXIT_TRANSIENT: u8 = 7;
pub const EXIT_INTERNAL: u8 = 8;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Into<Option<Value>>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: data.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with_data(command, error_class, message, exit_code, None)
    }

    pub fn failure_with_data(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Reports an application failure through its user-facing classification.
    pub fn from_application_error(command: &str, error: ApplicationError) -> Self {
        let detail = error.to_string();
        let interface = InterfaceError::from(error);
        let (exit_code, data) = match &interface {
            InterfaceError::Invalid { field_errors, .. } => (
                EXIT_VALIDATION,
                (!field_errors.is_empty())
                    .then(|| serde_json::json!({ "field_errors": field_errors })),
            ),
            InterfaceError::Precondition { redirect, .. } => {
                (EXIT_PRECONDITION, Some(serde_json::json!({ "redirect": redirect })))
            }
            InterfaceError::Transient { .. } => (EXIT_TRANSIENT, None),
            InterfaceError::Internal { .. } => (EXIT_INTERNAL, None),
        };

        Self::failure_with_data(
            command,
            interface.class(),
            format!("{} ({detail})", interface.user_message()),
            exit_code,
            data,
        )
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(command: &str, options: LoadOptions) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

pub(crate) fn runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            EXIT_RUNTIME,
        )
    })
}

/// Loads config, restores the stored session, and hands both to `action`.
pub(crate) fn with_session<F, Fut>(command: &str, options: LoadOptions, action: F) -> CommandResult
where
    F: FnOnce(Session, AppConfig) -> Fut,
    Fut: Future<Output = CommandResult>,
{
    let config = match load_config(command, options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match runtime(command) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let repository = match open_session_repository(&config.storage).await {
            Ok(repository) => repository,
            Err(error) => {
                return CommandResult::failure(
                    command,
                    "storage",
                    format!("failed to open session store: {error}"),
                    EXIT_STORAGE,
                );
            }
        };
        let session = match QuoteSession::restore(repository, Catalog::standard()).await {
            Ok(session) => session,
            Err(error) => {
                return CommandResult::failure(
                    command,
                    "storage",
                    format!("failed to load session: {error}"),
                    EXIT_STORAGE,
                );
            }
        };
        action(session, config).await
    })
}

#[cfg(test)]
mod tests {
    use atelier_core::domain::form::FormField;
    use atelier_core::errors::ApplicationError;
    use atelier_core::flows::{FieldError, WizardError, WizardStep};
    use serde_json::Value;

    use super::{CommandResult, EXIT_PRECONDITION, EXIT_VALIDATION};

    fn parse(result: &CommandResult) -> Value {
        serde_json::from_str(&result.output).expect("json output")
    }

    #[test]
    fn success_payload_carries_data() {
        let result =
            CommandResult::success_with_data("status", "fine", serde_json::json!({ "step": 2 }));
        let payload = parse(&result);

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["error_class"], Value::Null);
        assert_eq!(payload["data"]["step"], 2);
    }

    #[test]
    fn validation_errors_list_fields() {
        let error = ApplicationError::from(WizardError::ValidationFailed {
            step: WizardStep::BusinessInfo,
            errors: vec![FieldError::new(FormField::PhoneNumber, "Phone number is required")],
        });

        let result = CommandResult::from_application_error("next", error);
        let payload = parse(&result);

        assert_eq!(result.exit_code, EXIT_VALIDATION);
        assert_eq!(payload["error_class"], "validation");
        assert_eq!(payload["data"]["field_errors"][0]["message"], "Phone number is required");
    }

    #[test]
    fn missing_selection_reports_redirect() {
        let result = CommandResult::from_application_error(
            "next",
            ApplicationError::from(WizardError::MissingSelection),
        );
        let payload = parse(&result);

        assert_eq!(result.exit_code, EXIT_PRECONDITION);
        assert_eq!(payload["data"]["redirect"], "service_selection");
    }
}
