//! Sled persistence for supplies and their events
use super::supply::{EventId, Supply, SupplyEvent, SupplyId};
use anyhow::Context;
use sled::{Batch, Db};

const SUPPLY_PREFIX: &str = "supply:";
const EVENT_PREFIX: &str = "event:";

/// Read access to the current state of a supply.
pub trait SupplyEvents {
    fn find_current_event(&self, supply: &SupplyId) -> anyhow::Result<Option<SupplyEvent>>;
}

impl<T: SupplyEvents + ?Sized> SupplyEvents for &T {
    fn find_current_event(&self, supply: &SupplyId) -> anyhow::Result<Option<SupplyEvent>> {
        (**self).find_current_event(supply)
    }
}

fn supply_key(id: &SupplyId) -> Vec<u8> {
    format!("{SUPPLY_PREFIX}{id}").into_bytes()
}

fn event_key(id: &EventId) -> Vec<u8> {
    format!("{EVENT_PREFIX}{id}").into_bytes()
}

impl Supply {
    pub fn load_from_db(db: &Db, id: &SupplyId) -> anyhow::Result<Option<Self>> {
        let Some(bytes) = db.get(supply_key(id))? else {
            return Ok(None);
        };

        let supply = minicbor::decode(&bytes).with_context(|| format!("decoding supply {id}"))?;
        Ok(Some(supply))
    }
}

impl SupplyEvent {
    pub fn load_from_db(db: &Db, id: &EventId) -> anyhow::Result<Option<Self>> {
        let Some(bytes) = db.get(event_key(id))? else {
            return Ok(None);
        };

        let event = minicbor::decode(&bytes).with_context(|| format!("decoding event {id}"))?;
        Ok(Some(event))
    }

    /// Writes the event and points its supply at it in one batch.
    pub fn append_to_db(&self, db: &Db) -> anyhow::Result<Supply> {
        let (event_id, event_cbor) = self.finalise()?;
        let supply = Supply {
            id: self.supply().clone(),
            event: event_id,
        };

        let mut batch = Batch::default();
        batch.insert(event_key(&supply.event), event_cbor);
        batch.insert(supply_key(&supply.id), minicbor::to_vec(&supply)?);
        db.apply_batch(batch)?;

        Ok(supply)
    }
}

/// Current event of `supply`, if both the supply and its event are stored.
pub fn current_event(db: &Db, supply: &SupplyId) -> anyhow::Result<Option<SupplyEvent>> {
    match Supply::load_from_db(db, supply)? {
        Some(root) => SupplyEvent::load_from_db(db, &root.event),
        None => Ok(None),
    }
}

/// Events of `supply` from the current one back to the first.
pub fn history(db: &Db, supply: &SupplyId) -> anyhow::Result<Vec<SupplyEvent>> {
    let mut events = Vec::new();
    let mut cursor = Supply::load_from_db(db, supply)?.map(|root| root.event);

    while let Some(id) = cursor {
        let event = SupplyEvent::load_from_db(db, &id)?
            .with_context(|| format!("event {id} of supply {supply} is missing"))?;
        cursor = event.previous().cloned();
        events.push(event);
    }

    Ok(events)
}
