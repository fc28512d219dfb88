//! Service layer API for supply workflow operations
use super::config::StorageConfig;
use super::dispatch::CompleteSupplyMessage;
use super::edit::{SupplyEditDto, SupplyEditor};
use super::error::EditRejected;
use super::registry::StatusRegistry;
use super::status::Status;
use super::store::{self, SupplyEvents};
use super::supply::{ProductKey, Supply, SupplyEvent, SupplyId};
use anyhow::Context;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SupplyService {
    instance: Arc<sled::Db>,
    registry: Arc<StatusRegistry>,
}

impl SupplyService {
    pub fn new(instance: Arc<sled::Db>, registry: Arc<StatusRegistry>) -> Self {
        Self { instance, registry }
    }

    /// Opens the database described by `config`.
    pub fn open(config: &StorageConfig, registry: Arc<StatusRegistry>) -> anyhow::Result<Self> {
        let db = if config.temporary {
            sled::Config::new().temporary(true).open()?
        } else {
            sled::open(&config.path)
                .with_context(|| format!("opening supply store at {}", config.path.display()))?
        };

        Ok(Self::new(Arc::new(db), registry))
    }

    pub fn registry(&self) -> &StatusRegistry {
        &self.registry
    }

    /// Create a new supply. Without an explicit status it starts in the
    /// registry's initial one.
    pub fn create_supply(&self, supply: SupplyEditDto) -> anyhow::Result<Supply> {
        let status = supply.validate(&self.registry, None)?;
        let id = match supply.supply() {
            Some(id) => id.clone(),
            None => SupplyId::generate()?,
        };

        if Supply::load_from_db(&self.instance, &id)?.is_some() {
            anyhow::bail!("Supply {id} already exists");
        }

        let event = supply.into_event(id, None, status);
        let root = event.append_to_db(&self.instance)?;

        info!(supply = %root.id, status = %event.status(), "supply created");
        Ok(root)
    }

    /// A draft of the current state of `supply`, ready to be changed and
    /// submitted.
    pub fn edit_draft(&self, supply: &SupplyId) -> anyhow::Result<SupplyEditDto> {
        let event = self
            .find_current_event(supply)?
            .ok_or_else(|| EditRejected::SupplyNotFound(supply.to_string()))?;

        Ok(SupplyEditDto::from_event(&event))
    }

    /// Mark one line item as received. The returned message should be handed
    /// to a completion dispatcher.
    pub fn receive_product(
        &self,
        supply: &SupplyId,
        product: &ProductKey,
    ) -> anyhow::Result<CompleteSupplyMessage> {
        let mut edit = self.edit_draft(supply)?;

        let already_received = edit
            .products()
            .iter()
            .any(|line| line.key == *product && line.received);

        if already_received {
            debug!(%supply, %product, "product already received");
        } else {
            edit.receive(product)?;
            self.submit_edit(edit)?;

            info!(%supply, %product, "product received");
        }

        Ok(CompleteSupplyMessage::new(supply.clone()))
    }

    /// Events of a supply, newest first.
    pub fn history(&self, supply: &SupplyId) -> anyhow::Result<Vec<SupplyEvent>> {
        store::history(&self.instance, supply)
    }

    pub fn current_status(&self, supply: &SupplyId) -> anyhow::Result<Option<Status>> {
        let Some(event) = self.find_current_event(supply)? else {
            return Ok(None);
        };

        let status = self.registry.by_name(event.status())?;
        Ok(Some(status.clone()))
    }
}

impl SupplyEvents for SupplyService {
    fn find_current_event(&self, supply: &SupplyId) -> anyhow::Result<Option<SupplyEvent>> {
        store::current_event(&self.instance, supply)
    }
}

impl SupplyEditor for SupplyService {
    fn submit_edit(&self, edit: SupplyEditDto) -> Result<Supply, EditRejected> {
        let id = edit.supply().cloned().ok_or(EditRejected::MissingSupply)?;

        let root = Supply::load_from_db(&self.instance, &id)
            .map_err(|err| EditRejected::Storage(err.to_string()))?
            .ok_or_else(|| EditRejected::SupplyNotFound(id.to_string()))?;
        let current = SupplyEvent::load_from_db(&self.instance, &root.event)
            .map_err(|err| EditRejected::Storage(err.to_string()))?
            .ok_or_else(|| EditRejected::SupplyNotFound(id.to_string()))?;

        let status = edit.validate(&self.registry, Some(current.status()))?;
        let event = edit.into_event(id, Some(root.event), status);

        let updated = event
            .append_to_db(&self.instance)
            .map_err(|err| EditRejected::Storage(err.to_string()))?;

        debug!(
            supply = %updated.id,
            from = %current.status(),
            to = %event.status(),
            event = %updated.event,
            "supply edited"
        );
        Ok(updated)
    }
}
