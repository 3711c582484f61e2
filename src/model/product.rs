use std::fmt;

use async_graphql::{scalar, SimpleObject};
use bson::Bson;
use serde::{Deserialize, Serialize};

/// Identifier of a catalog product.
///
/// Compared exactly: two ids are equal only if their strings are equal.
#[derive(Debug, Serialize, Deserialize, Eq, Hash, PartialEq, Clone)]
#[serde(transparent)]
pub struct ProductId(String);

scalar!(ProductId, "ProductId", "Identifier of a catalog product.");

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ProductId> for Bson {
    fn from(value: ProductId) -> Self {
        Bson::String(value.0)
    }
}

/// Catalog product. Opaque to the cart core apart from its id.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, SimpleObject)]
pub struct Product {
    /// Product id.
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub cost: f64,
    pub rating: f64,
    /// URL of the product image.
    pub image: String,
}
