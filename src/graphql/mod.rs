//! GraphQL API over the cart, user and product services.

use async_graphql::{extensions::Logger, Context, EmptySubscription, ErrorExtensions, Result, Schema};

use crate::error::ServiceError;
use crate::model::User;
use crate::service::{CartService, ProductService, UserService};

pub mod mutation;
pub mod mutation_input_structs;
pub mod query;

use mutation::Mutation;
use query::Query;

pub type CartSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builds the schema with the services available to every resolver.
pub fn build_schema(
    cart_service: CartService,
    user_service: UserService,
    product_service: ProductService,
) -> CartSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .extension(Logger)
        .data(cart_service)
        .data(user_service)
        .data(product_service)
        .finish()
}

/// Schema without data, used to export the SDL.
pub fn sdl() -> String {
    Schema::build(Query, Mutation, EmptySubscription)
        .finish()
        .sdl()
}

/// Resolves the user a request acts for.
async fn resolve_user(ctx: &Context<'_>, email: &str) -> Result<User> {
    let user_service = ctx.data_unchecked::<UserService>();
    user_service
        .get_user_by_email(email)
        .await
        .map_err(|e| e.extend())?
        .ok_or_else(|| ServiceError::UserNotFound.extend())
}
