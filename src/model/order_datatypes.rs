use async_graphql::{Enum, InputObject};

/// GraphQL order direction.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum OrderDirection {
    /// Ascending order direction.
    #[default]
    Asc,
    /// Descending order direction.
    Desc,
}

/// Specifies the order of cart items, which are always ordered by the time they were added.
#[derive(InputObject, Default)]
pub struct CartItemOrderInput {
    /// Order direction of cart items.
    pub direction: Option<OrderDirection>,
}
