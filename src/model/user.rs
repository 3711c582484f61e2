use async_graphql::SimpleObject;
use bson::Uuid;
use serde::{Deserialize, Serialize};

/// Registered user. Owns at most one cart, keyed by `email`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, SimpleObject)]
pub struct User {
    /// UUID of the user.
    pub _id: Uuid,
    /// Display name of the user.
    pub name: String,
    /// Unique email address of the user.
    pub email: String,
    /// Shipping address of the user.
    pub address: Option<String>,
}

impl User {
    /// Creates a user without an address.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            _id: Uuid::new(),
            name: name.into(),
            email: email.into(),
            address: None,
        }
    }
}
