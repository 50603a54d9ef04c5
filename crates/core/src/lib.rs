pub mod config;
pub mod contact;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod pricing;
pub mod snapshot;
pub mod validation;

pub use domain::catalog::{AddOn, AddOnId, Catalog, PackageId, Service, ServiceId, ServicePackage};
pub use domain::form::{FormData, FormError, FormField, FormUpdate};
pub use domain::quote::{QuoteId, QuoteState};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{FieldError, Route, TransitionOutcome, WizardController, WizardError, WizardStep};
pub use pricing::{compute_total, price_breakdown, PriceBreakdown};
pub use snapshot::{QuoteSnapshot, SnapshotError};
