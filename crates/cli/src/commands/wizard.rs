//! Questionnaire commands. Each one restores the stored session, applies a
//! single action, and reports where the visitor stands afterwards.

use serde_json::{json, Value};

use atelier_core::config::LoadOptions;
use atelier_core::domain::catalog::{AddOnId, PackageId};
use atelier_core::domain::form::FormField;
use atelier_core::domain::quote::TOTAL_STEPS;
use atelier_core::errors::ApplicationError;
use atelier_core::flows::{Route, TransitionOutcome};
use atelier_core::pricing::{compute_total, format_amount, CURRENCY};

use crate::commands::{with_session, CommandResult, Session};

pub fn select(options: LoadOptions, package: &str) -> CommandResult {
    const COMMAND: &str = "select";
    let package_id = PackageId(package.trim().to_string());
    with_session(COMMAND, options, |mut session, _| async move {
        match session.select_package(&package_id).await {
            Ok(()) => CommandResult::success_with_data(
                COMMAND,
                format!("selected package `{}`", package_id.0),
                status_data(&session),
            ),
            Err(error) => CommandResult::from_application_error(COMMAND, error),
        }
    })
}

pub fn set(options: LoadOptions, field: &str, value: &str) -> CommandResult {
    const COMMAND: &str = "set";
    let field = match field.parse::<FormField>() {
        Ok(field) => field,
        Err(error) => {
            return CommandResult::from_application_error(COMMAND, ApplicationError::from(error))
        }
    };
    let value = value.to_string();
    with_session(COMMAND, options, |mut session, _| async move {
        match session.update_field(field, &value).await {
            Ok(()) => CommandResult::success_with_data(
                COMMAND,
                format!("updated `{field}`"),
                status_data(&session),
            ),
            Err(error) => CommandResult::from_application_error(COMMAND, error),
        }
    })
}

pub fn addon(options: LoadOptions, id: &str) -> CommandResult {
    const COMMAND: &str = "addon";
    let add_on_id = AddOnId::new(id.trim());
    with_session(COMMAND, options, |mut session, _| async move {
        match session.toggle_add_on(&add_on_id).await {
            Ok(selected) => {
                let verb = if selected { "added" } else { "removed" };
                CommandResult::success_with_data(
                    COMMAND,
                    format!("{verb} add-on `{}`", add_on_id.0),
                    status_data(&session),
                )
            }
            Err(error) => CommandResult::from_application_error(COMMAND, error),
        }
    })
}

pub fn next(options: LoadOptions) -> CommandResult {
    const COMMAND: &str = "next";
    with_session(COMMAND, options, |mut session, _| async move {
        let outcome = session.next().await;
        transition_result(COMMAND, &session, outcome)
    })
}

pub fn back(options: LoadOptions) -> CommandResult {
    const COMMAND: &str = "back";
    with_session(COMMAND, options, |mut session, _| async move {
        let outcome = session.back().await;
        transition_result(COMMAND, &session, outcome)
    })
}

pub fn goto(options: LoadOptions, step: u8) -> CommandResult {
    const COMMAND: &str = "goto";
    with_session(COMMAND, options, |mut session, _| async move {
        let outcome = session.goto(step).await;
        transition_result(COMMAND, &session, outcome)
    })
}

pub fn submit(options: LoadOptions) -> CommandResult {
    const COMMAND: &str = "submit";
    with_session(COMMAND, options, |mut session, _| async move {
        let outcome = session.submit().await;
        transition_result(COMMAND, &session, outcome)
    })
}

pub fn status(options: LoadOptions) -> CommandResult {
    const COMMAND: &str = "status";
    with_session(COMMAND, options, |mut session, _| async move {
        if !session.state().has_selection() {
            return CommandResult::success_with_data(
                COMMAND,
                "no package selected yet",
                status_data(&session),
            );
        }
        if let Err(error) = session.enter().await {
            return CommandResult::from_application_error(COMMAND, error);
        }
        let step = session.current_step();
        CommandResult::success_with_data(
            COMMAND,
            format!("step {} of {TOTAL_STEPS}: {}", step.number(), step.title()),
            status_data(&session),
        )
    })
}

pub fn reset(options: LoadOptions) -> CommandResult {
    const COMMAND: &str = "reset";
    with_session(COMMAND, options, |mut session, _| async move {
        match session.reset().await {
            Ok(()) => CommandResult::success_with_data(
                COMMAND,
                "session cleared",
                status_data(&session),
            ),
            Err(error) => CommandResult::from_application_error(COMMAND, error),
        }
    })
}

fn transition_result(
    command: &str,
    session: &Session,
    outcome: Result<TransitionOutcome, ApplicationError>,
) -> CommandResult {
    match outcome {
        Ok(outcome) => {
            let message = match (outcome.route, &outcome.quote_id) {
                (Route::QuoteView, Some(quote_id)) => format!("quote {quote_id} generated"),
                _ => format!("step {}: {}", outcome.to.number(), outcome.to.title()),
            };
            let mut data = status_data(session);
            data["transition"] = json!(outcome);
            CommandResult::success_with_data(command, message, data)
        }
        Err(error) => CommandResult::from_application_error(command, error),
    }
}

/// Where the visitor stands: route, step, selection, running total, and open errors.
fn status_data(session: &Session) -> Value {
    let state = session.state();
    let step = session.current_step();
    let route = if state.quote_id.is_some() {
        Route::QuoteView
    } else if state.has_selection() {
        Route::Questionnaire
    } else {
        Route::ServiceSelection
    };
    let total = state
        .selected_package
        .as_ref()
        .map(|package| compute_total(package, &state.form_data.add_ons, session.catalog()));
    let pending_errors =
        if route == Route::Questionnaire { session.pending_errors() } else { Vec::new() };

    json!({
        "route": route,
        "step": step.number(),
        "title": step.title(),
        "service": state.selected_service.as_ref().map(|service| &service.name),
        "package": state.selected_package.as_ref().map(|package| &package.id.0),
        "add_ons": state.form_data.add_ons.iter().map(|id| &id.0).collect::<Vec<_>>(),
        "total": total,
        "display_total": total.map(|total| format_amount(CURRENCY, total)),
        "pending_errors": pending_errors,
        "quote_id": state.quote_id,
    })
}

#[cfg(test)]
mod tests {
    use atelier_core::domain::catalog::{Catalog, PackageId};
    use atelier_db::repositories::InMemorySessionRepository;
    use atelier_db::{QuoteSession, SessionRepository};

    use super::status_data;
    use crate::commands::Session;

    async fn session() -> Session {
        let repository: Box<dyn SessionRepository> =
            Box::new(InMemorySessionRepository::default());
        QuoteSession::restore(repository, Catalog::standard()).await.expect("restore")
    }

    #[tokio::test]
    async fn fresh_session_points_at_service_selection() {
        let session = session().await;
        let data = status_data(&session);

        assert_eq!(data["route"], "service_selection");
        assert_eq!(data["total"], serde_json::Value::Null);
        assert_eq!(data["pending_errors"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn selection_reports_total_and_open_fields() {
        let mut session = session().await;
        session.select_package(&PackageId("web-starter".to_string())).await.expect("select");

        let data = status_data(&session);

        assert_eq!(data["route"], "questionnaire");
        assert_eq!(data["step"], 1);
        assert_eq!(data["package"], "web-starter");
        assert!(data["display_total"].as_str().is_some_and(|total| total.starts_with("KES ")));
        assert_eq!(data["pending_errors"].as_array().map(Vec::len), Some(5));
    }
}
