pub mod cart;
pub mod cart_item;
pub mod connection;
pub mod order_datatypes;
pub mod product;
pub mod user;

pub use cart::Cart;
pub use cart_item::{CartItem, Quantity};
pub use product::{Product, ProductId};
pub use user::User;
