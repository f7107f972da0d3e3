//! Immutable, self-validating scalar value types.

mod email;
mod ids;
mod money;

pub use email::Email;
pub use ids::{CustomerId, OrderId, ProductId};
pub use money::Money;
