//! Opaque entity identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a customer.
///
/// An opaque non-empty string; equality is by raw string value. The
/// system generates UUIDv4-format values when it assigns identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

/// Unique identifier for a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

/// Unique identifier for an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

macro_rules! impl_id {
    ($name:ident, $field:literal) => {
        impl $name {
            /// Wraps an existing identifier, rejecting blank input.
            pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(DomainError::EmptyValue { field: $field });
                }
                Ok(Self(id))
            }

            /// Generates a new random UUIDv4-format identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(id: String) -> Result<Self, Self::Error> {
                Self::new(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_id!(CustomerId, "customer id");
impl_id!(ProductId, "product id");
impl_id!(OrderId, "order id");
