#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("No supply statuses are registered")]
    Configuration,
    #[error("Supply status '{0}' is registered more than once")]
    DuplicateStatus(String),
    #[error("Unknown supply status '{0}'")]
    UnknownStatus(String),
}

/// Reasons an edit of a supply is refused. Returned by the editor in place of
/// the updated aggregate.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EditRejected {
    #[error("Unknown supply status '{0}'")]
    UnknownStatus(String),
    #[error("Edit does not reference a supply")]
    MissingSupply,
    #[error("Supply {0} does not exist")]
    SupplyNotFound(String),
    #[error("Supply must contain at least one product")]
    EmptyProducts,
    #[error("Product {0} has a zero quantity")]
    ZeroQuantity(String),
    #[error("Product {0} is not part of the supply")]
    UnknownProduct(String),
    #[error("Storage failure: {0}")]
    Storage(String),
}
