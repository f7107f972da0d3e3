//! Entity repositories over the single-table store.
//!
//! Each entity gets a repository that translates between domain types and
//! physical items through the [`mapping`] layer and issues the generic
//! store operations that realize its access patterns. Repositories are
//! generic over the backend, so every one of them runs unchanged against
//! the in-memory store in tests and the real table in production.

pub mod mapping;

mod customer;
mod error;
mod order;
mod pages;
mod product;

pub use customer::CustomerRepository;
pub use error::{MappingError, RepositoryError, Result};
pub use order::OrderRepository;
pub use pages::Paged;
pub use product::ProductRepository;
