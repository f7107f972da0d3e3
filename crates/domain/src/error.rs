//! Domain error types.

use thiserror::Error;

use crate::order::OrderStatus;

/// Errors raised by value-type construction and entity invariants.
///
/// All variants are detected synchronously at construction or mutation
/// time and are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A monetary amount below zero was supplied.
    #[error("money amount cannot be negative: {0}")]
    InvalidAmount(i64),

    /// A subtraction would have produced a negative amount.
    #[error("subtracting {subtrahend} from {minuend} would be negative")]
    NegativeResult { minuend: i64, subtrahend: i64 },

    /// A negative multiplication factor was supplied.
    #[error("multiplication factor cannot be negative: {0}")]
    InvalidFactor(f64),

    /// A required value was blank after trimming.
    #[error("{field} cannot be empty")]
    EmptyValue { field: &'static str },

    /// An email address did not match the expected format.
    #[error("invalid email format: {0}")]
    InvalidFormat(String),

    /// An order line was constructed with a zero quantity.
    #[error("quantity must be positive")]
    NonPositiveQuantity,

    /// An order line was constructed with a zero unit price.
    #[error("unit price must be positive")]
    ZeroOrNegativePrice,

    /// An order was constructed with no items.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// The order state machine does not permit the requested transition.
    #[error("invalid order status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A persisted status string did not name a known order status.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// A stock reservation exceeded the available quantity.
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: u32, requested: u32 },
}
