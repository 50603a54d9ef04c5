use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::form::FormField;
use crate::domain::quote::{QuoteId, FIRST_STEP, TOTAL_STEPS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    BusinessInfo,
    ProjectDetails,
    TimelineBudget,
    GoalsAudience,
    Review,
}

impl WizardStep {
    pub const ALL: [Self; TOTAL_STEPS as usize] = [
        Self::BusinessInfo,
        Self::ProjectDetails,
        Self::TimelineBudget,
        Self::GoalsAudience,
        Self::Review,
    ];

    pub fn from_number(step: u8) -> Option<Self> {
        step.checked_sub(FIRST_STEP).and_then(|index| Self::ALL.get(usize::from(index))).copied()
    }

    /// Clamps out-of-range numbers to the nearest step.
    pub fn clamped(step: u8) -> Self {
        Self::from_number(step.clamp(FIRST_STEP, TOTAL_STEPS)).unwrap_or(Self::BusinessInfo)
    }

    pub fn number(self) -> u8 {
        match self {
            Self::BusinessInfo => 1,
            Self::ProjectDetails => 2,
            Self::TimelineBudget => 3,
            Self::GoalsAudience => 4,
            Self::Review => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::BusinessInfo => "Business Info",
            Self::ProjectDetails => "Project Details",
            Self::TimelineBudget => "Timeline & Budget",
            Self::GoalsAudience => "Goals & Audience",
            Self::Review => "Review & Submit",
        }
    }

    /// Fields that must be answered before leaving this step.
    pub fn required_fields(self) -> &'static [FormField] {
        match self {
            Self::BusinessInfo => &[
                FormField::BusinessName,
                FormField::BusinessType,
                FormField::Industry,
                FormField::ContactEmail,
                FormField::PhoneNumber,
            ],
            Self::ProjectDetails => &[FormField::ContentReadiness, FormField::AssetsAvailable],
            Self::TimelineBudget => &[FormField::Timeline, FormField::Budget],
            Self::GoalsAudience => &[FormField::ProjectGoals, FormField::TargetAudience],
            Self::Review => &[],
        }
    }

    pub fn is_last(self) -> bool {
        self == Self::Review
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.title(), self.number(), TOTAL_STEPS)
    }
}

/// Where the shell should take the visitor next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    ServiceSelection,
    Questionnaire,
    QuoteView,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardEvent {
    Advance,
    Back,
    JumpTo(u8),
    Submit,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: WizardStep,
    pub to: WizardStep,
    pub event: WizardEvent,
    pub route: Route,
    pub quote_id: Option<QuoteId>,
}
