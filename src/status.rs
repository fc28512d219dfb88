//! Supply status values and the built-in lifecycle variants
use super::error::StatusError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Identifier of a status as it is stored on a supply event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusId(String);

/// A lifecycle status. Two statuses are equal when their identifiers are, the
/// remaining fields are presentation and access metadata.
#[derive(Debug, Clone)]
pub struct Status {
    identifier: String,
    priority: i32,
    color: String,
    role: String,
}

/// The statuses a supply moves through out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupplyStatus {
    New,
    Delivery,
    Clearance,
    Completed,
    Cancel,
}

/// Anything that names a status: plain strings, ids, statuses and variants.
pub trait StatusName {
    fn status_name(&self) -> &str;
}

/// Compares two status representations by identifier.
pub fn equals<A, B>(a: &A, b: &B) -> bool
where
    A: StatusName + ?Sized,
    B: StatusName + ?Sized,
{
    a.status_name() == b.status_name()
}

impl StatusId {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Status {
    pub fn new(
        identifier: impl Into<String>,
        priority: i32,
        color: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            priority,
            color: color.into(),
            role: role.into(),
        }
    }
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
    pub fn priority(&self) -> i32 {
        self.priority
    }
    pub fn color(&self) -> &str {
        &self.color
    }
    /// Access-control role required to see or set this status.
    pub fn role(&self) -> &str {
        &self.role
    }
    pub fn id(&self) -> StatusId {
        StatusId::new(self.identifier.clone())
    }
}

impl SupplyStatus {
    /// Every built-in variant, in registration order.
    pub const ALL: [SupplyStatus; 5] = [
        SupplyStatus::New,
        SupplyStatus::Delivery,
        SupplyStatus::Clearance,
        SupplyStatus::Completed,
        SupplyStatus::Cancel,
    ];

    pub const fn identifier(self) -> &'static str {
        match self {
            SupplyStatus::New => "new",
            SupplyStatus::Delivery => "delivery",
            SupplyStatus::Clearance => "clearance",
            SupplyStatus::Completed => "completed",
            SupplyStatus::Cancel => "cancel",
        }
    }
    pub const fn priority(self) -> i32 {
        match self {
            SupplyStatus::New => 100,
            SupplyStatus::Clearance => 300,
            SupplyStatus::Delivery => 400,
            SupplyStatus::Completed => 900,
            SupplyStatus::Cancel => 999,
        }
    }
    pub const fn color(self) -> &'static str {
        match self {
            SupplyStatus::New => "#0d6efd",
            SupplyStatus::Clearance => "#ffc107",
            SupplyStatus::Delivery => "#0dcaf0",
            SupplyStatus::Completed => "#198754",
            SupplyStatus::Cancel => "#dc3545",
        }
    }
    pub const fn role(self) -> &'static str {
        match self {
            SupplyStatus::New => "ROLE_PRODUCT_SUPPLY_NEW",
            SupplyStatus::Clearance => "ROLE_PRODUCT_SUPPLY_CLEARANCE",
            SupplyStatus::Delivery => "ROLE_PRODUCT_SUPPLY_DELIVERY",
            SupplyStatus::Completed => "ROLE_PRODUCT_SUPPLY_COMPLETED",
            SupplyStatus::Cancel => "ROLE_PRODUCT_SUPPLY_CANCEL",
        }
    }
    pub fn id(self) -> StatusId {
        StatusId::new(self.identifier())
    }
}

impl From<SupplyStatus> for Status {
    fn from(value: SupplyStatus) -> Self {
        Status::new(
            value.identifier(),
            value.priority(),
            value.color(),
            value.role(),
        )
    }
}

impl FromStr for SupplyStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SupplyStatus::ALL
            .into_iter()
            .find(|variant| variant.identifier() == s)
            .ok_or_else(|| StatusError::UnknownStatus(s.to_string()))
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}
impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl PartialEq<str> for Status {
    fn eq(&self, other: &str) -> bool {
        self.identifier == other
    }
}
impl PartialEq<&str> for Status {
    fn eq(&self, other: &&str) -> bool {
        self.identifier == *other
    }
}
impl PartialEq<StatusId> for Status {
    fn eq(&self, other: &StatusId) -> bool {
        self.identifier == other.0
    }
}
impl PartialEq<SupplyStatus> for Status {
    fn eq(&self, other: &SupplyStatus) -> bool {
        self.identifier == other.identifier()
    }
}
impl PartialEq<SupplyStatus> for StatusId {
    fn eq(&self, other: &SupplyStatus) -> bool {
        self.0 == other.identifier()
    }
}

impl StatusName for str {
    fn status_name(&self) -> &str {
        self
    }
}
impl StatusName for String {
    fn status_name(&self) -> &str {
        self
    }
}
impl StatusName for StatusId {
    fn status_name(&self) -> &str {
        &self.0
    }
}
impl StatusName for Status {
    fn status_name(&self) -> &str {
        &self.identifier
    }
}
impl StatusName for SupplyStatus {
    fn status_name(&self) -> &str {
        self.identifier()
    }
}
impl<T: StatusName + ?Sized> StatusName for &T {
    fn status_name(&self) -> &str {
        (**self).status_name()
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}
impl fmt::Display for SupplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl From<&str> for StatusId {
    fn from(value: &str) -> Self {
        StatusId::new(value)
    }
}
impl From<String> for StatusId {
    fn from(value: String) -> Self {
        StatusId(value)
    }
}
impl From<SupplyStatus> for StatusId {
    fn from(value: SupplyStatus) -> Self {
        value.id()
    }
}
impl From<&Status> for StatusId {
    fn from(value: &Status) -> Self {
        value.id()
    }
}

// Statuses are persisted by identifier only, the registry supplies the rest.
impl<C> minicbor::Encode<C> for StatusId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&self.0)?.ok()
    }
}
impl<'b, C> minicbor::Decode<'b, C> for StatusId {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        Ok(StatusId(d.str()?.to_string()))
    }
}
