pub mod cart;
pub mod product;
pub mod user;

pub use cart::CartService;
pub use product::ProductService;
pub use user::UserService;
