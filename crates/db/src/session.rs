use atelier_core::domain::catalog::{AddOnId, Catalog, PackageId};
use atelier_core::domain::form::{FormField, FormUpdate};
use atelier_core::domain::quote::QuoteState;
use atelier_core::errors::{ApplicationError, DomainError};
use atelier_core::flows::{FieldError, TransitionOutcome, WizardController, WizardError, WizardStep};
use atelier_core::snapshot::QuoteSnapshot;

use crate::repositories::{RepositoryError, SessionRepository};

/// One visitor's wizard session. Every mutation is written through to the
/// repository before the call returns.
pub struct QuoteSession<R> {
    state: QuoteState,
    catalog: Catalog,
    controller: WizardController,
    repository: R,
}

impl<R: SessionRepository> QuoteSession<R> {
    /// Loads the stored session. An unreadable record is discarded and the
    /// session starts over.
    pub async fn restore(repository: R, catalog: Catalog) -> Result<Self, RepositoryError> {
        let state = match repository.load().await {
            Ok(state) => state,
            Err(RepositoryError::Decode(reason)) => {
                tracing::warn!(
                    event_name = "session.discarded",
                    reason = %reason,
                    "stored session could not be decoded; starting a new one"
                );
                QuoteState::default()
            }
            Err(error) => return Err(error),
        };

        Ok(Self { state, catalog, controller: WizardController::new(), repository })
    }

    pub fn state(&self) -> &QuoteState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_step(&self) -> WizardStep {
        WizardStep::clamped(self.state.current_step)
    }

    /// Errors the current step would raise if the visitor pressed next now.
    pub fn pending_errors(&self) -> Vec<FieldError> {
        self.controller.validate_step(self.current_step(), &self.state.form_data)
    }

    pub async fn select_package(&mut self, package_id: &PackageId) -> Result<(), ApplicationError> {
        let (service, package) = self.catalog.find_package(package_id).ok_or_else(|| {
            DomainError::UnknownCatalogItem { kind: "package", id: package_id.0.clone() }
        })?;
        let (service, package) = (service.clone(), package.clone());

        tracing::info!(
            event_name = "session.package_selected",
            service = %service.id.0,
            package = %package.id.0,
            "package selected"
        );
        self.state.set_selected_service(service);
        self.state.set_selected_package(package);
        self.persist().await
    }

    /// Answers need a selected package. Changing one discards an issued quote.
    pub async fn update_field(&mut self, field: FormField, raw: &str) -> Result<(), ApplicationError> {
        self.enter().await?;
        let update = FormUpdate::parse(field, raw)?;
        self.state.update_form_data(update);
        self.persist().await
    }

    /// Returns whether the add-on is selected after the toggle.
    pub async fn toggle_add_on(&mut self, add_on_id: &AddOnId) -> Result<bool, ApplicationError> {
        self.enter().await?;
        if self.catalog.find_add_on(add_on_id).is_none() {
            return Err(
                DomainError::UnknownCatalogItem { kind: "add-on", id: add_on_id.0.clone() }.into()
            );
        }
        let selected = self.state.toggle_add_on(add_on_id.clone());
        self.persist().await?;
        Ok(selected)
    }

    pub async fn enter(&mut self) -> Result<WizardStep, ApplicationError> {
        let stored_step = self.state.current_step;
        let step = self.controller.enter(&mut self.state)?;
        if step.number() != stored_step {
            self.persist().await?;
        }
        Ok(step)
    }

    pub async fn next(&mut self) -> Result<TransitionOutcome, ApplicationError> {
        self.transition(|controller, state| controller.advance(state)).await
    }

    pub async fn back(&mut self) -> Result<TransitionOutcome, ApplicationError> {
        self.transition(|controller, state| controller.previous(state)).await
    }

    pub async fn goto(&mut self, step: u8) -> Result<TransitionOutcome, ApplicationError> {
        self.transition(|controller, state| controller.jump_to(state, step)).await
    }

    pub async fn submit(&mut self) -> Result<TransitionOutcome, ApplicationError> {
        self.transition(|controller, state| controller.submit(state)).await
    }

    pub async fn reset(&mut self) -> Result<(), ApplicationError> {
        self.state.reset();
        self.repository.clear().await?;
        tracing::info!(event_name = "session.reset", "session reset");
        Ok(())
    }

    pub fn snapshot(&self) -> Result<QuoteSnapshot, ApplicationError> {
        Ok(QuoteSnapshot::capture(&self.state, &self.catalog)?)
    }

    async fn transition<F>(&mut self, apply: F) -> Result<TransitionOutcome, ApplicationError>
    where
        F: FnOnce(&WizardController, &mut QuoteState) -> Result<TransitionOutcome, WizardError>,
    {
        let before = self.state.clone();
        let outcome = apply(&self.controller, &mut self.state);
        if self.state != before {
            self.persist().await?;
        }
        Ok(outcome?)
    }

    async fn persist(&self) -> Result<(), ApplicationError> {
        self.repository.save(&self.state).await?;
        tracing::debug!(
            event_name = "session.saved",
            step = self.state.current_step,
            "session saved"
        );
        Ok(())
    }
}
