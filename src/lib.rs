//! Cart management for an e-commerce backend.
//!
//! [`service::CartService`] owns every rule about what a cart may contain.
//! Persistence and the product catalog are injected through the traits in
//! [`store`], with in-memory and MongoDB implementations provided.

pub mod config;
pub mod error;
pub mod graphql;
pub mod model;
pub mod service;
pub mod store;

pub use error::{ErrorKind, ServiceError};
