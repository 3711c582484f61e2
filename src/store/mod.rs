//! Persistence contracts consumed by the services, with in-memory and MongoDB implementations.

use async_trait::async_trait;
use bson::Uuid;
use thiserror::Error;

use crate::model::{Cart, CartItem, Product, ProductId, User};

pub mod memory;
pub mod mongo;

/// Errors raised by stores and the catalog.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored document changed since it was read, or already exists on create.
    #[error("Document `{key}` was modified concurrently")]
    WriteConflict { key: String },

    /// The document to replace does not exist.
    #[error("Document `{key}` not found")]
    Missing { key: String },

    #[error("MongoDB error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Read-only product lookup.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>>;

    async fn find_all(&self) -> Result<Vec<Product>>;
}

/// Storage of cart documents, keyed by the owner's email.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_one(&self, owner: &str) -> Result<Option<Cart>>;

    /// Creates the cart of `owner` holding `initial_items`.
    ///
    /// Fails with `WriteConflict` if `owner` already has a cart.
    async fn create(&self, owner: &str, initial_items: Vec<CartItem>) -> Result<Cart>;

    /// Replaces the whole stored cart if its stored version still equals `cart.version`.
    ///
    /// Returns the stored cart, whose version is one higher. Fails with
    /// `WriteConflict` on a version mismatch or if the cart no longer exists.
    async fn save(&self, cart: &Cart) -> Result<Cart>;
}

/// Storage of user documents.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Fails with `WriteConflict` if the email is already registered.
    async fn create(&self, user: &User) -> Result<()>;

    /// Fails with `Missing` if the user does not exist.
    async fn save(&self, user: &User) -> Result<()>;
}
