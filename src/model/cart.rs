use async_graphql::{ComplexObject, Result, SimpleObject};
use bson::datetime::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

use super::{
    cart_item::{CartItem, Quantity},
    connection::cart_item_connection::CartItemConnection,
    order_datatypes::{CartItemOrderInput, OrderDirection},
    product::ProductId,
};

/// The cart of a user.
///
/// Holds at most one item per product. `version` increases by one on every
/// successful save and is used to reject writes based on a stale read.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Cart {
    /// Email of the user owning the cart.
    #[serde(rename = "_id")]
    pub email: String,
    /// Version of the stored cart document.
    pub version: i64,
    /// Timestamp when cart was last updated.
    pub last_updated_at: DateTime,
    #[graphql(skip)]
    #[serde(rename = "cart_items")]
    /// Cart items in insertion order.
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(email: impl Into<String>, items: Vec<CartItem>) -> Self {
        Self {
            email: email.into(),
            version: 0,
            last_updated_at: DateTime::now(),
            items,
        }
    }

    pub fn contains_product(&self, product_id: &ProductId) -> bool {
        self.position_of(product_id).is_some()
    }

    fn position_of(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product.id == product_id)
    }

    /// Appends an item, rejecting a second item for the same product.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), ServiceError> {
        if self.contains_product(&item.product.id) {
            return Err(ServiceError::ProductAlreadyInCart);
        }
        self.items.push(item);
        Ok(())
    }

    /// Overwrites the quantity of the item referencing `product_id`.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<(), ServiceError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
            .ok_or(ServiceError::ProductNotInCart)?;
        item.quantity = quantity;
        Ok(())
    }

    /// Removes the item referencing `product_id`, keeping the order of the others.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<CartItem, ServiceError> {
        let position = self
            .position_of(product_id)
            .ok_or(ServiceError::ProductNotInCart)?;
        Ok(self.items.remove(position))
    }
}

#[ComplexObject]
impl Cart {
    /// Retrieves cart items in cart.
    async fn cart_items(
        &self,
        #[graphql(desc = "Describes that the `first` N cart items should be retrieved.")]
        first: Option<usize>,
        #[graphql(desc = "Describes how many cart items should be skipped at the beginning.")]
        skip: Option<usize>,
        #[graphql(desc = "Specifies the order in which cart items are retrieved.")]
        order_by: Option<CartItemOrderInput>,
    ) -> Result<CartItemConnection> {
        let mut cart_items = self.items.clone();
        order_cart_items(&mut cart_items, order_by);
        let total_count = cart_items.len();
        let definitely_skip = skip.unwrap_or(0);
        let definitely_first = first.unwrap_or(usize::MAX);
        let cart_items_part: Vec<CartItem> = cart_items
            .into_iter()
            .skip(definitely_skip)
            .take(definitely_first)
            .collect();
        let has_next_page = total_count > cart_items_part.len() + definitely_skip;
        Ok(CartItemConnection {
            nodes: cart_items_part,
            has_next_page,
            total_count: total_count as u64,
        })
    }
}

/// Orders cart items by the time they were added.
///
/// Items are stored in insertion order, so descending order is its exact reverse,
/// including items added within the same millisecond.
///
/// * `cart_items` - Vector of cart items in insertion order.
/// * `order_by` - Specifies order of sorted result.
fn order_cart_items(cart_items: &mut [CartItem], order_by: Option<CartItemOrderInput>) {
    match order_by.unwrap_or_default().direction.unwrap_or_default() {
        OrderDirection::Asc => {}
        OrderDirection::Desc => cart_items.reverse(),
    }
}
