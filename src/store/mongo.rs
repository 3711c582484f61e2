use async_trait::async_trait;
use bson::{doc, DateTime, Uuid};
use futures::TryStreamExt;
use log::info;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};

use crate::model::{Cart, CartItem, Product, ProductId, User};

use super::{CartStore, CatalogGateway, Result, StoreError, UserStore};

/// MongoDB error code of a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// Checks if a MongoDB error is a unique index violation.
fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

/// Catalog backed by the `products` collection.
#[derive(Clone)]
pub struct MongoCatalog {
    collection: Collection<Product>,
}

impl MongoCatalog {
    pub fn new(db_client: &Database) -> Self {
        Self {
            collection: db_client.collection::<Product>("products"),
        }
    }
}

#[async_trait]
impl CatalogGateway for MongoCatalog {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self
            .collection
            .find_one(doc! {"_id": id.clone() }, None)
            .await?)
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let cursor = self.collection.find(None, None).await?;
        let products: Vec<Product> = cursor.try_collect().await?;
        Ok(products)
    }
}

/// Cart store backed by the `carts` collection.
///
/// Saves replace the whole document, filtered on the version that was read.
#[derive(Clone)]
pub struct MongoCartStore {
    collection: Collection<Cart>,
}

impl MongoCartStore {
    pub fn new(db_client: &Database) -> Self {
        Self {
            collection: db_client.collection::<Cart>("carts"),
        }
    }
}

#[async_trait]
impl CartStore for MongoCartStore {
    async fn find_one(&self, owner: &str) -> Result<Option<Cart>> {
        Ok(self.collection.find_one(doc! {"_id": owner }, None).await?)
    }

    async fn create(&self, owner: &str, initial_items: Vec<CartItem>) -> Result<Cart> {
        let cart = Cart::new(owner, initial_items);
        match self.collection.insert_one(&cart, None).await {
            Ok(_) => Ok(cart),
            Err(error) if is_duplicate_key(&error) => Err(StoreError::WriteConflict {
                key: owner.to_string(),
            }),
            Err(error) => Err(error.into()),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<Cart> {
        let next = Cart {
            version: cart.version + 1,
            last_updated_at: DateTime::now(),
            ..cart.clone()
        };
        let result = self
            .collection
            .replace_one(
                doc! {"_id": cart.email.as_str(), "version": cart.version },
                &next,
                None,
            )
            .await?;
        match result.matched_count {
            0 => Err(StoreError::WriteConflict {
                key: cart.email.clone(),
            }),
            _ => Ok(next),
        }
    }
}

/// User store backed by the `users` collection.
#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db_client: &Database) -> Self {
        Self {
            collection: db_client.collection::<User>("users"),
        }
    }

    /// Creates the unique index on `email`, which `create` relies on under concurrency.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! {"email": 1})
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        info!("Unique index on `users.email` is in place.");
        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! {"_id": id }, None).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! {"email": email }, None)
            .await?)
    }

    async fn create(&self, user: &User) -> Result<()> {
        match self.collection.insert_one(user, None).await {
            Ok(_) => Ok(()),
            Err(error) if is_duplicate_key(&error) => Err(StoreError::WriteConflict {
                key: user.email.clone(),
            }),
            Err(error) => Err(error.into()),
        }
    }

    async fn save(&self, user: &User) -> Result<()> {
        let result = self
            .collection
            .replace_one(doc! {"_id": user._id }, user, None)
            .await?;
        match result.matched_count {
            0 => Err(StoreError::Missing {
                key: user._id.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
