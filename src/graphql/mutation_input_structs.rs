use async_graphql::InputObject;

use crate::model::{ProductId, Quantity};

#[derive(InputObject)]
pub struct CartItemInput {
    /// Email of user owning the cart.
    pub email: String,
    /// Id of product in cart.
    pub product_id: ProductId,
    /// Count of units in cart.
    pub quantity: Quantity,
}

#[derive(InputObject)]
pub struct CreateUserInput {
    /// Display name of the user.
    pub name: String,
    /// Email address of the user, unique among users.
    pub email: String,
}
