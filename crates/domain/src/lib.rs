//! Domain layer for the single-table commerce system.
//!
//! This crate provides:
//! - Self-validating value types (Money, Email, entity identifiers)
//! - Entities (Customer, Product, Order) enforcing their invariants
//! - The order status state machine
//! - The domain error taxonomy

pub mod customer;
pub mod error;
pub mod order;
pub mod product;
pub mod value;

pub use customer::Customer;
pub use error::DomainError;
pub use order::{Order, OrderItem, OrderStatus};
pub use product::Product;
pub use value::{CustomerId, Email, Money, OrderId, ProductId};
