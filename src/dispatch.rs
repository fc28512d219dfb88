//! Completion of a supply once every line item has been received
use super::edit::{SupplyEditDto, SupplyEditor};
use super::error::EditRejected;
use super::status::{self, StatusId, SupplyStatus};
use super::store::SupplyEvents;
use super::supply::{Supply, SupplyId};
use tracing::{debug, error, info};

/// Asks for `supply` to be completed if all of its products have arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteSupplyMessage {
    pub supply: SupplyId,
}

/// What a dispatch did. Nothing is raised to the caller, failures are
/// returned here and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new event carrying the completed status was written.
    Completed(Supply),
    /// Some line items are still pending, nothing was written.
    NotEligible,
    /// The supply already carries the target status, nothing was written.
    AlreadyCompleted,
    /// The supply has no current event.
    MissingAggregate,
    /// The current event could not be read.
    StoreFailure(String),
    /// The editor refused the completion.
    Rejected(EditRejected),
}

pub struct CompletionDispatcher<E, W> {
    events: E,
    editor: W,
    target: StatusId,
}

impl CompleteSupplyMessage {
    pub fn new(supply: SupplyId) -> Self {
        Self { supply }
    }
}

impl DispatchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DispatchOutcome::Completed(_))
    }
}

impl<E: SupplyEvents, W: SupplyEditor> CompletionDispatcher<E, W> {
    pub fn new(events: E, editor: W) -> Self {
        Self {
            events,
            editor,
            target: SupplyStatus::Completed.id(),
        }
    }

    /// Uses `target` instead of the built-in completed status.
    pub fn with_target(mut self, target: impl Into<StatusId>) -> Self {
        self.target = target.into();
        self
    }

    pub fn handle(&self, message: &CompleteSupplyMessage) -> DispatchOutcome {
        let supply = &message.supply;

        let event = match self.events.find_current_event(supply) {
            Ok(Some(event)) => event,
            Ok(None) => {
                error!(%supply, "supply has no current event, completion skipped");
                return DispatchOutcome::MissingAggregate;
            }
            Err(err) => {
                error!(%supply, error = %err, "failed to load current supply event");
                return DispatchOutcome::StoreFailure(err.to_string());
            }
        };

        let from = event.status().clone();
        if status::equals(&from, &self.target) {
            debug!(%supply, status = %from, "supply already completed");
            return DispatchOutcome::AlreadyCompleted;
        }

        let edit = SupplyEditDto::from_event(&event).set_status(self.target.clone());

        if edit.has_pending_products() {
            debug!(%supply, status = %from, "supply still has pending products");
            return DispatchOutcome::NotEligible;
        }

        match self.editor.submit_edit(edit) {
            Ok(updated) => {
                info!(%supply, %from, to = %self.target, event = %updated.event, "supply completed");
                DispatchOutcome::Completed(updated)
            }
            Err(rejection) => {
                error!(
                    %supply,
                    %from,
                    to = %self.target,
                    %rejection,
                    "failed to complete supply"
                );
                DispatchOutcome::Rejected(rejection)
            }
        }
    }
}
