//! Supply aggregate, its event snapshots and line items
use super::status::StatusId;
use bech32::Bech32m;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;
use uuid7::uuid7;

/// Bech32 encoded uuid7 with a `supply_` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SupplyId(String);

/// Hex sha256 digest of an encoded [`SupplyEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(String);

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl<T: TimeZone + PartialEq> PartialOrd for TimeStamp<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl<T: TimeZone + Eq> Ord for TimeStamp<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// The root of a supply. Only the pointer to the current event ever changes.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Supply {
    #[n(0)]
    pub id: SupplyId,
    #[n(1)]
    pub event: EventId,
}

/// Shipping data that identifies the delivery itself.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Default, Clone, PartialEq, Eq)]
pub struct SupplyInvariable {
    #[n(0)]
    pub container: Option<String>, // container number
    #[n(1)]
    pub declaration: Option<String>, // customs declaration number
}

/// Who made the change.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct SupplyPersonal {
    #[n(0)]
    pub user: String,
    #[n(1)]
    pub profile: Option<String>,
}

/// Identity of a product within a supply.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ProductKey {
    #[n(0)]
    pub product: String,
    #[n(1)]
    pub offer: Option<String>,
    #[n(2)]
    pub variation: Option<String>,
    #[n(3)]
    pub modification: Option<String>,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct SupplyProduct {
    #[n(0)]
    pub key: ProductKey,
    #[n(1)]
    pub total: u32, // ordered quantity
    #[n(2)]
    pub received: bool,
}

/// One immutable snapshot of a supply. A change never touches an existing
/// event, it produces a new one linked to its predecessor through `previous`.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct SupplyEvent {
    #[n(0)]
    supply: SupplyId,
    #[n(1)]
    previous: Option<EventId>,
    #[n(2)]
    status: StatusId,
    #[n(3)]
    invariable: SupplyInvariable,
    #[n(4)]
    personal: Option<SupplyPersonal>,
    #[n(5)]
    products: Vec<SupplyProduct>,
    #[n(6)]
    created: TimeStamp<Utc>,
}

impl SupplyId {
    pub const HRP: &'static str = "supply_";

    /// A fresh id for a new supply.
    pub fn generate() -> anyhow::Result<Self> {
        let hrp = bech32::Hrp::parse(Self::HRP)?;
        let encoded = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;

        Ok(Self(encoded))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductKey {
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            ..Self::default()
        }
    }
    pub fn set_offer(mut self, offer: impl Into<String>) -> Self {
        self.offer = Some(offer.into());
        self
    }
    pub fn set_variation(mut self, variation: impl Into<String>) -> Self {
        self.variation = Some(variation.into());
        self
    }
    pub fn set_modification(mut self, modification: impl Into<String>) -> Self {
        self.modification = Some(modification.into());
        self
    }
}

impl SupplyProduct {
    pub fn new(key: ProductKey, total: u32) -> Self {
        Self {
            key,
            total,
            received: false,
        }
    }
    pub fn set_received(mut self, received: bool) -> Self {
        self.received = received;
        self
    }
}

impl SupplyEvent {
    pub fn new(
        supply: SupplyId,
        previous: Option<EventId>,
        status: StatusId,
        invariable: SupplyInvariable,
        personal: Option<SupplyPersonal>,
        products: Vec<SupplyProduct>,
    ) -> Self {
        Self {
            supply,
            previous,
            status,
            invariable,
            personal,
            products,
            created: TimeStamp::new(),
        }
    }
    pub fn supply(&self) -> &SupplyId {
        &self.supply
    }
    pub fn previous(&self) -> Option<&EventId> {
        self.previous.as_ref()
    }
    pub fn status(&self) -> &StatusId {
        &self.status
    }
    pub fn invariable(&self) -> &SupplyInvariable {
        &self.invariable
    }
    pub fn personal(&self) -> Option<&SupplyPersonal> {
        self.personal.as_ref()
    }
    pub fn created(&self) -> &TimeStamp<Utc> {
        &self.created
    }
    /// Owned copy of the line items.
    pub fn products(&self) -> Vec<SupplyProduct> {
        self.products.clone()
    }
    pub fn all_received(&self) -> bool {
        self.products.iter().all(|product| product.received)
    }
    /// Encodes the event into CBOR, the id is the digest of that encoding.
    pub fn finalise(&self) -> anyhow::Result<(EventId, Vec<u8>)> {
        let contents = minicbor::to_vec(self)?;
        let hash = sha256::digest(&contents);

        Ok((EventId(hash), contents))
    }
}

impl fmt::Display for SupplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.product)?;
        for part in [&self.offer, &self.variation, &self.modification]
            .into_iter()
            .flatten()
        {
            write!(f, "/{part}")?;
        }
        Ok(())
    }
}

impl From<&str> for SupplyId {
    fn from(value: &str) -> Self {
        SupplyId(value.to_string())
    }
}
impl From<String> for SupplyId {
    fn from(value: String) -> Self {
        SupplyId(value)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId(value.to_string())
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}
impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

impl<C> minicbor::Encode<C> for SupplyId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&self.0)?.ok()
    }
}
impl<'b, C> minicbor::Decode<'b, C> for SupplyId {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        Ok(SupplyId(d.str()?.to_string()))
    }
}

impl<C> minicbor::Encode<C> for EventId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&self.0)?.ok()
    }
}
impl<'b, C> minicbor::Decode<'b, C> for EventId {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        Ok(EventId(d.str()?.to_string()))
    }
}
