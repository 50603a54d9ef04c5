use thiserror::Error;

use crate::domain::form::{FormData, FormField};
use crate::domain::quote::QuoteState;
use crate::flows::states::{FieldError, Route, TransitionOutcome, WizardEvent, WizardStep};
use crate::validation::{validate_email, validate_phone_number};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("no service package has been selected")]
    MissingSelection,
    #[error("selected package `{package}` does not belong to service `{service}`")]
    MismatchedPackage { service: String, package: String },
    #[error("{step} has {} invalid field(s)", errors.len())]
    ValidationFailed { step: WizardStep, errors: Vec<FieldError> },
    #[error("cannot jump from step {from} to step {to}")]
    InvalidJump { from: u8, to: u8 },
    #[error("a quote can only be generated from the review step (current step {step})")]
    NotAtReview { step: u8 },
    #[error("quote {quote_id} has already been generated")]
    AlreadyGenerated { quote_id: String },
}

impl WizardError {
    /// Precondition failures name the route the visitor belongs on instead.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::MissingSelection | Self::MismatchedPackage { .. } => {
                Some(Route::ServiceSelection)
            }
            Self::AlreadyGenerated { .. } => Some(Route::QuoteView),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationFailed { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Drives the five questionnaire steps over a [`QuoteState`].
#[derive(Clone, Debug, Default)]
pub struct WizardController;

impl WizardController {
    pub fn new() -> Self {
        Self
    }

    /// Entry guard. Also pulls a persisted out-of-range step back into bounds.
    pub fn enter(&self, state: &mut QuoteState) -> Result<WizardStep, WizardError> {
        ensure_selection(state)?;

        let step = WizardStep::clamped(state.current_step);
        if step.number() != state.current_step {
            tracing::warn!(
                event_name = "wizard.step_clamped",
                stored_step = state.current_step,
                step = step.number(),
                "persisted wizard step was out of range"
            );
            state.set_current_step(step.number());
        }
        Ok(step)
    }

    pub fn validate_step(&self, step: WizardStep, form: &FormData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match step {
            WizardStep::BusinessInfo => {
                require_text(
                    &mut errors,
                    form.business_name.as_deref(),
                    FormField::BusinessName,
                    "Business name is required",
                );
                require_text(
                    &mut errors,
                    form.business_type.as_deref(),
                    FormField::BusinessType,
                    "Business type is required",
                );
                require_text(
                    &mut errors,
                    form.industry.as_deref(),
                    FormField::Industry,
                    "Industry is required",
                );

                match answered(form.contact_email.as_deref()) {
                    None => {
                        errors.push(FieldError::new(FormField::ContactEmail, "Email is required"))
                    }
                    Some(email) if !validate_email(email) => errors.push(FieldError::new(
                        FormField::ContactEmail,
                        "Please enter a valid email",
                    )),
                    Some(_) => {}
                }

                match answered(form.phone_number.as_deref()) {
                    None => errors.push(FieldError::new(
                        FormField::PhoneNumber,
                        "Phone number is required",
                    )),
                    Some(phone) if !validate_phone_number(phone) => errors.push(FieldError::new(
                        FormField::PhoneNumber,
                        "Please enter a valid Kenyan phone number",
                    )),
                    Some(_) => {}
                }
            }
            WizardStep::ProjectDetails => {
                if form.content_readiness.is_none() {
                    errors.push(FieldError::new(
                        FormField::ContentReadiness,
                        "Please select content readiness",
                    ));
                }
                if form.assets_available.is_none() {
                    errors.push(FieldError::new(
                        FormField::AssetsAvailable,
                        "Please select assets availability",
                    ));
                }
            }
            WizardStep::TimelineBudget => {
                if form.timeline.is_none() {
                    errors.push(FieldError::new(FormField::Timeline, "Please select timeline"));
                }
                if form.budget.is_none() {
                    errors.push(FieldError::new(FormField::Budget, "Please select budget range"));
                }
            }
            WizardStep::GoalsAudience => {
                require_text(
                    &mut errors,
                    form.project_goals.as_deref(),
                    FormField::ProjectGoals,
                    "Project goals are required",
                );
                require_text(
                    &mut errors,
                    form.target_audience.as_deref(),
                    FormField::TargetAudience,
                    "Target audience is required",
                );
            }
            WizardStep::Review => {}
        }
        errors
    }

    /// Validates the current step and moves forward. On the review step this submits.
    pub fn advance(&self, state: &mut QuoteState) -> Result<TransitionOutcome, WizardError> {
        let from = self.enter(state)?;
        if from.is_last() {
            return self.submit(state);
        }

        let errors = self.validate_step(from, &state.form_data);
        if !errors.is_empty() {
            return Err(rejected(from, errors));
        }

        state.next_step();
        let to = WizardStep::clamped(state.current_step);
        tracing::info!(
            event_name = "wizard.step_advanced",
            from = from.number(),
            to = to.number(),
            "wizard advanced"
        );
        Ok(TransitionOutcome {
            from,
            to,
            event: WizardEvent::Advance,
            route: Route::Questionnaire,
            quote_id: None,
        })
    }

    /// Moves back one step without validating; a no-op on the first step.
    pub fn previous(&self, state: &mut QuoteState) -> Result<TransitionOutcome, WizardError> {
        let from = self.enter(state)?;
        state.previous_step();
        let to = WizardStep::clamped(state.current_step);
        tracing::debug!(
            event_name = "wizard.step_back",
            from = from.number(),
            to = to.number(),
            "wizard moved back"
        );
        Ok(TransitionOutcome {
            from,
            to,
            event: WizardEvent::Back,
            route: Route::Questionnaire,
            quote_id: None,
        })
    }

    /// Revisits an earlier (or the current) step. Forward jumps would skip validation.
    pub fn jump_to(
        &self,
        state: &mut QuoteState,
        target: u8,
    ) -> Result<TransitionOutcome, WizardError> {
        let from = self.enter(state)?;
        let to = WizardStep::from_number(target)
            .filter(|step| *step <= from)
            .ok_or(WizardError::InvalidJump { from: from.number(), to: target })?;

        state.set_current_step(to.number());
        Ok(TransitionOutcome {
            from,
            to,
            event: WizardEvent::JumpTo(target),
            route: Route::Questionnaire,
            quote_id: None,
        })
    }

    /// Terminal action: re-checks every answer, issues the quote id, and leaves the wizard.
    /// A pass issues at most one id; editing an answer discards it and reopens submission.
    pub fn submit(&self, state: &mut QuoteState) -> Result<TransitionOutcome, WizardError> {
        let from = self.enter(state)?;
        if let Some(quote_id) = &state.quote_id {
            return Err(WizardError::AlreadyGenerated { quote_id: quote_id.to_string() });
        }
        if !from.is_last() {
            return Err(WizardError::NotAtReview { step: from.number() });
        }

        for step in WizardStep::ALL.into_iter().filter(|step| !step.is_last()) {
            let errors = self.validate_step(step, &state.form_data);
            if !errors.is_empty() {
                return Err(rejected(step, errors));
            }
        }

        let quote_id = state.generate_quote();
        tracing::info!(
            event_name = "wizard.quote_generated",
            quote_id = %quote_id,
            "quote generated"
        );
        Ok(TransitionOutcome {
            from,
            to: from,
            event: WizardEvent::Submit,
            route: Route::QuoteView,
            quote_id: Some(quote_id),
        })
    }
}

fn ensure_selection(state: &QuoteState) -> Result<(), WizardError> {
    match (&state.selected_service, &state.selected_package) {
        (Some(service), Some(package)) if service.owns(package) => Ok(()),
        (Some(service), Some(package)) => Err(WizardError::MismatchedPackage {
            service: service.id.0.clone(),
            package: package.id.0.clone(),
        }),
        _ => Err(WizardError::MissingSelection),
    }
}

fn rejected(step: WizardStep, errors: Vec<FieldError>) -> WizardError {
    tracing::info!(
        event_name = "wizard.step_rejected",
        step = step.number(),
        invalid_fields = errors.len(),
        "wizard step failed validation"
    );
    WizardError::ValidationFailed { step, errors }
}

fn answered(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

fn require_text(
    errors: &mut Vec<FieldError>,
    value: Option<&str>,
    field: FormField,
    message: &'static str,
) {
    if answered(value).is_none() {
        errors.push(FieldError::new(field, message));
    }
}
