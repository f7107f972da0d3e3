//! Application use cases over the repositories: the order-placement
//! orchestrator and thin CRUD services per entity. Everything is generic
//! over the store backend.

mod customers;
mod error;
mod orders;
mod place_order;
mod products;

pub use customers::{CustomerService, UpdateCustomer};
pub use error::{Result, UseCaseError};
pub use orders::OrderService;
pub use place_order::{OrderLine, PlaceOrder, PlaceOrderRequest};
pub use products::{ProductService, UpdateProduct};
