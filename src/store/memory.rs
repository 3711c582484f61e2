use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{DateTime, Uuid};
use tokio::sync::RwLock;

use crate::model::{Cart, CartItem, Product, ProductId, User};

use super::{CartStore, CatalogGateway, Result, StoreError, UserStore};

/// In-memory catalog, for tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    /// Adds or replaces a product.
    pub async fn insert(&self, product: Product) {
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
    }
}

#[async_trait]
impl CatalogGateway for InMemoryCatalog {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by(|first, second| first.id.as_str().cmp(second.id.as_str()));
        Ok(products)
    }
}

/// In-memory cart store with the same versioning rules as the MongoDB store.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<String, Cart>>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored carts.
    pub async fn cart_count(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_one(&self, owner: &str) -> Result<Option<Cart>> {
        Ok(self.carts.read().await.get(owner).cloned())
    }

    async fn create(&self, owner: &str, initial_items: Vec<CartItem>) -> Result<Cart> {
        let mut carts = self.carts.write().await;
        if carts.contains_key(owner) {
            return Err(StoreError::WriteConflict {
                key: owner.to_string(),
            });
        }
        let cart = Cart::new(owner, initial_items);
        carts.insert(owner.to_string(), cart.clone());
        Ok(cart)
    }

    async fn save(&self, cart: &Cart) -> Result<Cart> {
        let mut carts = self.carts.write().await;
        let stored = carts
            .get_mut(&cart.email)
            .filter(|stored| stored.version == cart.version)
            .ok_or_else(|| StoreError::WriteConflict {
                key: cart.email.clone(),
            })?;
        *stored = Cart {
            version: cart.version + 1,
            last_updated_at: DateTime::now(),
            ..cart.clone()
        };
        Ok(stored.clone())
    }
}

/// In-memory user store.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::WriteConflict {
                key: user.email.clone(),
            });
        }
        users.insert(user._id, user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<()> {
        match self.users.write().await.get_mut(&user._id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(StoreError::Missing {
                key: user._id.to_string(),
            }),
        }
    }
}
