use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::model::{Cart, Product, ProductId, User};
use crate::service::{CartService, ProductService, UserService};

use super::resolve_user;

/// Describes GraphQL cart queries.
pub struct Query;

#[Object]
impl Query {
    /// Retrieves the cart of the user with the given email.
    async fn cart<'a>(
        &self,
        ctx: &Context<'a>,
        #[graphql(desc = "Email of user owning the cart.")] email: String,
    ) -> Result<Cart> {
        let user = resolve_user(ctx, &email).await?;
        let cart_service = ctx.data_unchecked::<CartService>();
        cart_service
            .get_cart_by_user(&user)
            .await
            .map_err(|e| e.extend())
    }

    /// Retrieves the user with the given email.
    async fn user<'a>(
        &self,
        ctx: &Context<'a>,
        #[graphql(desc = "Email of user to retrieve.")] email: String,
    ) -> Result<Option<User>> {
        let user_service = ctx.data_unchecked::<UserService>();
        user_service
            .get_user_by_email(&email)
            .await
            .map_err(|e| e.extend())
    }

    /// Retrieves product of specific id.
    async fn product<'a>(
        &self,
        ctx: &Context<'a>,
        #[graphql(desc = "Id of product to retrieve.")] id: ProductId,
    ) -> Result<Option<Product>> {
        let product_service = ctx.data_unchecked::<ProductService>();
        product_service
            .get_product_by_id(&id)
            .await
            .map_err(|e| e.extend())
    }

    /// Retrieves all products of the catalog.
    async fn products<'a>(&self, ctx: &Context<'a>) -> Result<Vec<Product>> {
        let product_service = ctx.data_unchecked::<ProductService>();
        product_service.get_products().await.map_err(|e| e.extend())
    }
}
