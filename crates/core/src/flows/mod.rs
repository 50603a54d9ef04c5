pub mod engine;
pub mod states;

pub use engine::{WizardController, WizardError};
pub use states::{FieldError, Route, TransitionOutcome, WizardEvent, WizardStep};
