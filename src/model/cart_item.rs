use std::fmt;

use async_graphql::{scalar, SimpleObject};
use bson::datetime::DateTime;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// Number of units of a product in a cart. Always at least one.
#[derive(Debug, Serialize, Deserialize, Eq, Hash, PartialEq, Ord, PartialOrd, Clone, Copy)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

scalar!(
    Quantity,
    "Quantity",
    "Positive number of units of a product in a cart."
);

impl Quantity {
    /// Returns `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Quantity::new(value).ok_or_else(|| format!("Quantity must be at least 1, got `{}`.", value))
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Cart item in the cart of a user.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, SimpleObject)]
pub struct CartItem {
    /// Snapshot of the product taken when the item was added.
    pub product: Product,
    /// Count of units in cart.
    pub quantity: Quantity,
    /// Timestamp when cart item was added.
    pub added_at: DateTime,
}

impl CartItem {
    pub fn new(product: Product, quantity: Quantity) -> Self {
        Self {
            product,
            quantity,
            added_at: DateTime::now(),
        }
    }
}
