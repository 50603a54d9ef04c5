use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::{Catalog, Service, ServicePackage};
use crate::domain::form::FormData;
use crate::domain::quote::{QuoteId, QuoteState};
use crate::pricing::{price_breakdown, PriceBreakdown};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("no service package has been selected")]
    MissingSelection,
    #[error("the questionnaire has not been submitted yet")]
    QuoteNotGenerated,
}

/// Everything needed to render or send a finished quote, captured at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    pub service: Service,
    pub package: ServicePackage,
    pub form_data: FormData,
    pub quote_id: QuoteId,
    pub generated_at: DateTime<Utc>,
    pub breakdown: PriceBreakdown,
    pub total: u64,
}

impl QuoteSnapshot {
    pub fn capture(state: &QuoteState, catalog: &Catalog) -> Result<Self, SnapshotError> {
        let (Some(service), Some(package)) = (&state.selected_service, &state.selected_package)
        else {
            return Err(SnapshotError::MissingSelection);
        };
        let (Some(quote_id), Some(generated_at)) = (&state.quote_id, state.generated_at) else {
            return Err(SnapshotError::QuoteNotGenerated);
        };

        let breakdown = price_breakdown(package, &state.form_data.add_ons, catalog);
        Ok(Self {
            service: service.clone(),
            package: package.clone(),
            form_data: state.form_data.clone(),
            quote_id: quote_id.clone(),
            generated_at,
            total: breakdown.total,
            breakdown,
        })
    }

    /// `quote-<quoteId>.<extension>`
    pub fn file_name(&self, extension: &str) -> String {
        format!("quote-{}.{extension}", self.quote_id)
    }

    pub fn business_name(&self) -> &str {
        self.form_data.business_name.as_deref().unwrap_or_default()
    }

    pub fn contact_email(&self) -> &str {
        self.form_data.contact_email.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::catalog::{AddOnId, Catalog, PackageId};
    use crate::domain::quote::QuoteState;

    use super::{QuoteSnapshot, SnapshotError};

    fn state_with_package() -> QuoteState {
        let catalog = Catalog::standard();
        let (service, package) =
            catalog.find_package(&PackageId("web-starter".to_string())).expect("package");
        let mut state = QuoteState::default();
        state.set_selected_service(service.clone());
        state.set_selected_package(package.clone());
        state
    }

    #[test]
    fn snapshot_requires_a_selection() {
        let error = QuoteSnapshot::capture(&QuoteState::default(), &Catalog::standard())
            .expect_err("nothing selected");
        assert_eq!(error, SnapshotError::MissingSelection);
    }

    #[test]
    fn snapshot_requires_a_generated_quote() {
        let error = QuoteSnapshot::capture(&state_with_package(), &Catalog::standard())
            .expect_err("not submitted");
        assert_eq!(error, SnapshotError::QuoteNotGenerated);
    }

    #[test]
    fn snapshot_carries_total_and_file_name() {
        let mut state = state_with_package();
        state.toggle_add_on(AddOnId::new("seo-optimization"));
        state.toggle_add_on(AddOnId::new("analytics-setup"));
        let quote_id = state.generate_quote();

        let snapshot =
            QuoteSnapshot::capture(&state, &Catalog::standard()).expect("complete snapshot");

        assert_eq!(snapshot.total, 40_000);
        assert_eq!(snapshot.breakdown.add_ons.len(), 2);
        assert_eq!(snapshot.file_name("pdf"), format!("quote-{quote_id}.pdf"));
    }
}
