use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::model::{Cart, ProductId, User};
use crate::service::{CartService, UserService};

use super::{
    mutation_input_structs::{CartItemInput, CreateUserInput},
    resolve_user,
};

/// Describes GraphQL cart mutations.
pub struct Mutation;

#[Object]
impl Mutation {
    /// Adds a product to the cart of a user, creating the cart if the user has none.
    async fn add_product_to_cart<'a>(
        &self,
        ctx: &Context<'a>,
        #[graphql(desc = "CartItemInput")] input: CartItemInput,
    ) -> Result<Cart> {
        let user = resolve_user(ctx, &input.email).await?;
        let cart_service = ctx.data_unchecked::<CartService>();
        cart_service
            .add_product_to_cart(&user, &input.product_id, input.quantity)
            .await
            .map_err(|e| e.extend())
    }

    /// Updates the quantity of a product already in the cart of a user.
    async fn update_product_in_cart<'a>(
        &self,
        ctx: &Context<'a>,
        #[graphql(desc = "CartItemInput")] input: CartItemInput,
    ) -> Result<Cart> {
        let user = resolve_user(ctx, &input.email).await?;
        let cart_service = ctx.data_unchecked::<CartService>();
        cart_service
            .update_product_in_cart(&user, &input.product_id, input.quantity)
            .await
            .map_err(|e| e.extend())
    }

    /// Removes a product from the cart of a user.
    async fn delete_product_from_cart<'a>(
        &self,
        ctx: &Context<'a>,
        #[graphql(desc = "Email of user owning the cart.")] email: String,
        #[graphql(desc = "Id of product to remove.")] product_id: ProductId,
    ) -> Result<bool> {
        let user = resolve_user(ctx, &email).await?;
        let cart_service = ctx.data_unchecked::<CartService>();
        cart_service
            .delete_product_from_cart(&user, &product_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(true)
    }

    /// Registers a user.
    async fn create_user<'a>(
        &self,
        ctx: &Context<'a>,
        #[graphql(desc = "CreateUserInput")] input: CreateUserInput,
    ) -> Result<User> {
        let user_service = ctx.data_unchecked::<UserService>();
        user_service
            .create_user(&input.name, &input.email)
            .await
            .map_err(|e| e.extend())
    }

    /// Sets the shipping address of a user and returns it.
    async fn set_address<'a>(
        &self,
        ctx: &Context<'a>,
        #[graphql(desc = "Email of user to update.")] email: String,
        #[graphql(desc = "New shipping address.")] address: String,
    ) -> Result<String> {
        let mut user = resolve_user(ctx, &email).await?;
        let user_service = ctx.data_unchecked::<UserService>();
        user_service
            .set_address(&mut user, address)
            .await
            .map_err(|e| e.extend())
    }
}
