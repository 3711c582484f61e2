use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::{Result, ServiceError};
use crate::model::{Cart, CartItem, Product, ProductId, Quantity, User};
use crate::store::{CartStore, CatalogGateway, StoreError};

/// Reads and mutates the carts of users.
///
/// Every mutation loads the cart, changes it in memory and saves the whole
/// document back. The store rejects a save based on a stale read, which is
/// surfaced as the retryable [`ServiceError::WriteConflict`].
#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartStore>,
    catalog: Arc<dyn CatalogGateway>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartStore>, catalog: Arc<dyn CatalogGateway>) -> Self {
        Self { carts, catalog }
    }

    /// Fetches the cart of `user`.
    pub async fn get_cart_by_user(&self, user: &User) -> Result<Cart> {
        self.carts
            .find_one(&user.email)
            .await?
            .ok_or(ServiceError::CartNotFound)
    }

    /// Adds a product to the cart of `user`, creating the cart if the user has none.
    ///
    /// A product already in the cart is rejected before the catalog is consulted.
    pub async fn add_product_to_cart(
        &self,
        user: &User,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<Cart> {
        let existing_cart = self.carts.find_one(&user.email).await?;
        if let Some(cart) = &existing_cart {
            if cart.contains_product(product_id) {
                debug!("Product `{}` already in cart of `{}`.", product_id, user.email);
                return Err(ServiceError::ProductAlreadyInCart);
            }
        }
        let product = self.find_product(product_id).await?;
        let item = CartItem::new(product, quantity);
        let cart = match existing_cart {
            Some(mut cart) => {
                cart.add_item(item)?;
                self.save(&cart).await?
            }
            None => self.create_cart(&user.email, item).await?,
        };
        info!(
            "Added {} of product `{}` to cart of `{}`.",
            quantity, product_id, user.email
        );
        Ok(cart)
    }

    /// Overwrites the quantity of a product already in the cart of `user`.
    pub async fn update_product_in_cart(
        &self,
        user: &User,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<Cart> {
        let mut cart = self
            .carts
            .find_one(&user.email)
            .await?
            .ok_or(ServiceError::CartRequired)?;
        self.find_product(product_id).await?;
        cart.set_quantity(product_id, quantity)?;
        let cart = self.save(&cart).await?;
        info!(
            "Set quantity of product `{}` in cart of `{}` to {}.",
            product_id, user.email, quantity
        );
        Ok(cart)
    }

    /// Removes a product from the cart of `user`. An emptied cart is kept.
    pub async fn delete_product_from_cart(&self, user: &User, product_id: &ProductId) -> Result<()> {
        let mut cart = self.get_cart_by_user(user).await?;
        cart.remove_item(product_id)?;
        self.save(&cart).await?;
        info!(
            "Removed product `{}` from cart of `{}`.",
            product_id, user.email
        );
        Ok(())
    }

    async fn find_product(&self, product_id: &ProductId) -> Result<Product> {
        self.catalog.find_by_id(product_id).await?.ok_or_else(|| {
            debug!("Product `{}` not found in catalog.", product_id);
            ServiceError::ProductNotInDatabase
        })
    }

    /// Creates a cart already holding its first item, so an empty intermediate cart is never stored.
    async fn create_cart(&self, owner: &str, item: CartItem) -> Result<Cart> {
        match self.carts.create(owner, vec![item]).await {
            Ok(cart) => Ok(cart),
            Err(StoreError::WriteConflict { key }) => {
                warn!("Cart of `{}` was created concurrently.", key);
                Err(ServiceError::WriteConflict { owner: key })
            }
            Err(error) => {
                warn!("Creating cart of `{}` failed: {}", owner, error);
                Err(ServiceError::CartNotCreated(error))
            }
        }
    }

    async fn save(&self, cart: &Cart) -> Result<Cart> {
        self.carts.save(cart).await.map_err(|error| {
            warn!("Saving cart of `{}` failed: {}", cart.email, error);
            ServiceError::from(error)
        })
    }
}
