use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use refurb_core::ProductId;

use crate::group::ProductGroup;

/// Whether a product can currently be bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Unavailable => "Unavailable",
        }
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Only the exact "Available" tag makes a product purchasable; any other status
// string the source sends is treated as unavailable rather than failing the load.
impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "Available" {
            Availability::Available
        } else {
            Availability::Unavailable
        })
    }
}

/// A catalog product as published by the catalog source.
///
/// Immutable once loaded. `price <= msrp` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    group: ProductGroup,
    #[serde(with = "rust_decimal::serde::float")]
    msrp: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    status: Availability,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        group: impl Into<ProductGroup>,
        msrp: Decimal,
        price: Decimal,
        status: Availability,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: group.into(),
            msrp,
            price,
            status,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &ProductGroup {
        &self.group
    }

    /// List price.
    pub fn msrp(&self) -> Decimal {
        self.msrp
    }

    /// Actual selling price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn status(&self) -> Availability {
        self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == Availability::Available
    }

    /// Discount off list price for one unit; negative if priced above MSRP.
    pub fn unit_savings(&self) -> Decimal {
        self.msrp - self.price
    }
}
