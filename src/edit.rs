//! Requested state of a supply, submitted to an editor to produce a new event
use super::error::EditRejected;
use super::registry::StatusRegistry;
use super::status::StatusId;
use super::supply::{
    EventId, ProductKey, Supply, SupplyEvent, SupplyId, SupplyInvariable, SupplyPersonal,
    SupplyProduct,
};

/// Target state for a new or existing supply. An editor turns it into a new
/// [`SupplyEvent`] and repoints the supply at it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SupplyEditDto {
    supply: Option<SupplyId>, // None when creating
    status: Option<StatusId>, // None keeps the current status, or starts in the initial one
    invariable: SupplyInvariable,
    personal: Option<SupplyPersonal>,
    products: Vec<SupplyProduct>,
}

/// Applies a [`SupplyEditDto`] and hands back the repointed aggregate.
pub trait SupplyEditor {
    fn submit_edit(&self, edit: SupplyEditDto) -> Result<Supply, EditRejected>;
}

impl<T: SupplyEditor + ?Sized> SupplyEditor for &T {
    fn submit_edit(&self, edit: SupplyEditDto) -> Result<Supply, EditRejected> {
        (**self).submit_edit(edit)
    }
}

impl SupplyEditDto {
    /// An empty draft for a supply that does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }
    /// A draft of `event` targeting the same supply. The line items are a copy.
    pub fn from_event(event: &SupplyEvent) -> Self {
        Self {
            supply: Some(event.supply().clone()),
            status: Some(event.status().clone()),
            invariable: event.invariable().clone(),
            personal: event.personal().cloned(),
            products: event.products(),
        }
    }
    pub fn set_supply(mut self, supply: SupplyId) -> Self {
        self.supply = Some(supply);
        self
    }
    pub fn set_status(mut self, status: impl Into<StatusId>) -> Self {
        self.status = Some(status.into());
        self
    }
    pub fn set_container(mut self, container: impl Into<String>) -> Self {
        self.invariable.container = Some(container.into());
        self
    }
    pub fn set_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.invariable.declaration = Some(declaration.into());
        self
    }
    pub fn set_personal(mut self, user: impl Into<String>, profile: Option<String>) -> Self {
        self.personal = Some(SupplyPersonal {
            user: user.into(),
            profile,
        });
        self
    }
    pub fn set_products(mut self, products: Vec<SupplyProduct>) -> Self {
        self.products = products;
        self
    }
    pub fn add_product(mut self, product: SupplyProduct) -> Self {
        self.products.push(product);
        self
    }

    pub fn supply(&self) -> Option<&SupplyId> {
        self.supply.as_ref()
    }
    pub fn status(&self) -> Option<&StatusId> {
        self.status.as_ref()
    }
    pub fn invariable(&self) -> &SupplyInvariable {
        &self.invariable
    }
    pub fn personal(&self) -> Option<&SupplyPersonal> {
        self.personal.as_ref()
    }
    pub fn products(&self) -> &[SupplyProduct] {
        &self.products
    }

    /// True while at least one line item is still on its way.
    pub fn has_pending_products(&self) -> bool {
        self.products.iter().any(|product| !product.received)
    }

    /// Marks the line item identified by `key` as received.
    pub fn receive(&mut self, key: &ProductKey) -> Result<(), EditRejected> {
        let product = self
            .products
            .iter_mut()
            .find(|product| product.key == *key)
            .ok_or_else(|| EditRejected::UnknownProduct(key.to_string()))?;

        product.received = true;
        Ok(())
    }

    /// Checks the draft and resolves the status the new event will carry.
    /// `current` is the status of the supply being edited, if any.
    pub fn validate(
        &self,
        registry: &StatusRegistry,
        current: Option<&StatusId>,
    ) -> Result<StatusId, EditRejected> {
        if self.products.is_empty() {
            return Err(EditRejected::EmptyProducts);
        }
        if let Some(product) = self.products.iter().find(|product| product.total == 0) {
            return Err(EditRejected::ZeroQuantity(product.key.to_string()));
        }

        let status = match self.status.as_ref().or(current) {
            Some(status) => registry
                .by_name(status)
                .map_err(|_| EditRejected::UnknownStatus(status.to_string()))?,
            None => registry.initial(),
        };

        Ok(status.id())
    }

    /// Builds the event that supersedes `previous`.
    pub fn into_event(
        self,
        supply: SupplyId,
        previous: Option<EventId>,
        status: StatusId,
    ) -> SupplyEvent {
        SupplyEvent::new(
            supply,
            previous,
            status,
            self.invariable,
            self.personal,
            self.products,
        )
    }
}
