use thiserror::Error;

use crate::domain::form::FormError;
use crate::flows::{FieldError, Route, WizardError};
use crate::snapshot::SnapshotError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("unknown {kind} `{id}`")]
    UnknownCatalogItem { kind: &'static str, id: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("export failure: {0}")]
    Export(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<WizardError> for ApplicationError {
    fn from(value: WizardError) -> Self {
        Self::Domain(value.into())
    }
}

impl From<FormError> for ApplicationError {
    fn from(value: FormError) -> Self {
        Self::Domain(value.into())
    }
}

impl From<SnapshotError> for ApplicationError {
    fn from(value: SnapshotError) -> Self {
        Self::Domain(value.into())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("invalid input: {message}")]
    Invalid { message: String, field_errors: Vec<FieldError> },
    #[error("precondition failed: {message}")]
    Precondition { message: String, redirect: Route },
    #[error("temporarily unavailable: {message}")]
    Transient { message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "Some answers need attention. Correct them and try again.",
            Self::Precondition { redirect: Route::ServiceSelection, .. } => {
                "Choose a service package before starting the questionnaire."
            }
            Self::Precondition { redirect: Route::QuoteView, .. } => {
                "Your quote is ready. Change an answer to generate a new one."
            }
            Self::Precondition { .. } => "Finish the questionnaire to generate your quote.",
            Self::Transient { .. } => "That did not work this time. Please try again.",
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    /// Stable class name for machine-readable output.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "validation",
            Self::Precondition { .. } => "precondition",
            Self::Transient { .. } => "transient",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let message = value.to_string();
        match value {
            ApplicationError::Domain(DomainError::Wizard(error)) => match error.redirect() {
                Some(redirect) => Self::Precondition { message, redirect },
                None => Self::Invalid { message, field_errors: error.field_errors().to_vec() },
            },
            ApplicationError::Domain(DomainError::Snapshot(SnapshotError::MissingSelection)) => {
                Self::Precondition { message, redirect: Route::ServiceSelection }
            }
            ApplicationError::Domain(DomainError::Snapshot(SnapshotError::QuoteNotGenerated)) => {
                Self::Precondition { message, redirect: Route::Questionnaire }
            }
            ApplicationError::Domain(_) => Self::Invalid { message, field_errors: Vec::new() },
            ApplicationError::Persistence(_) | ApplicationError::Export(_) => {
                Self::Transient { message }
            }
            ApplicationError::Configuration(_) => Self::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::form::{FormError, FormField};
    use crate::errors::{ApplicationError, InterfaceError};
    use crate::flows::{FieldError, Route, WizardError, WizardStep};
    use crate::snapshot::SnapshotError;

    #[test]
    fn validation_failure_keeps_field_errors() {
        let interface = InterfaceError::from(ApplicationError::from(WizardError::ValidationFailed {
            step: WizardStep::BusinessInfo,
            errors: vec![FieldError::new(FormField::ContactEmail, "Please enter a valid email")],
        }));

        assert!(matches!(
            interface,
            InterfaceError::Invalid { ref field_errors, .. } if field_errors.len() == 1
        ));
        assert_eq!(interface.class(), "validation");
    }

    #[test]
    fn missing_selection_maps_to_redirect() {
        let interface = InterfaceError::from(ApplicationError::from(WizardError::MissingSelection));

        assert!(matches!(
            interface,
            InterfaceError::Precondition { redirect: Route::ServiceSelection, .. }
        ));
        assert_eq!(
            interface.user_message(),
            "Choose a service package before starting the questionnaire."
        );
    }

    #[test]
    fn unsubmitted_quote_redirects_to_questionnaire() {
        let interface =
            InterfaceError::from(ApplicationError::from(SnapshotError::QuoteNotGenerated));
        assert!(matches!(
            interface,
            InterfaceError::Precondition { redirect: Route::Questionnaire, .. }
        ));
    }

    #[test]
    fn resubmission_redirects_to_quote_view() {
        let interface = InterfaceError::from(ApplicationError::from(
            WizardError::AlreadyGenerated { quote_id: "Q-LZ3K9A1B-X7Q2M".to_owned() },
        ));
        assert!(matches!(
            interface,
            InterfaceError::Precondition { redirect: Route::QuoteView, .. }
        ));
        assert_eq!(interface.class(), "precondition");
    }

    #[test]
    fn unknown_form_field_is_invalid_input() {
        let interface =
            InterfaceError::from(ApplicationError::from(FormError::UnknownField("x".to_owned())));
        assert_eq!(interface.class(), "validation");
    }

    #[test]
    fn export_failure_is_transient() {
        let interface =
            InterfaceError::from(ApplicationError::Export("renderer crashed".to_owned()));

        assert!(matches!(interface, InterfaceError::Transient { .. }));
        assert_eq!(interface.user_message(), "That did not work this time. Please try again.");
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface =
            InterfaceError::from(ApplicationError::Configuration("bad storage url".to_owned()));
        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }
}
