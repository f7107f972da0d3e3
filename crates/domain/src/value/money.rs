//! Monetary amounts in integer minor units.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A non-negative monetary amount held in cents.
///
/// All persisted and derived monetary values are computed in integer
/// cents; floating point appears only in the display-oriented
/// [`Money::dollars`] accessor and the generic [`Money::multiply`] factor.
///
/// Serializes as a bare integer (cents), which is the representation used
/// by the denormalized order-item payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Creates a new amount from cents, rejecting negative values.
    pub fn new(cents: i64) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::InvalidAmount(cents));
        }
        Ok(Self { cents })
    }

    /// Returns the zero amount.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the amount in dollars, for display only.
    pub fn dollars(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Adds another amount.
    pub fn add(&self, other: Money) -> Money {
        Money {
            cents: self.cents + other.cents,
        }
    }

    /// Subtracts another amount, failing if the result would be negative.
    pub fn subtract(&self, other: Money) -> Result<Money, DomainError> {
        if self.cents < other.cents {
            return Err(DomainError::NegativeResult {
                minuend: self.cents,
                subtrahend: other.cents,
            });
        }
        Ok(Money {
            cents: self.cents - other.cents,
        })
    }

    /// Multiplies by a non-negative factor, rounding half-up to the
    /// nearest cent.
    pub fn multiply(&self, factor: f64) -> Result<Money, DomainError> {
        if factor < 0.0 {
            return Err(DomainError::InvalidFactor(factor));
        }
        let cents = (self.cents as f64 * factor).round() as i64;
        Ok(Money { cents })
    }

    /// Multiplies by an integer quantity. Used for line totals, where the
    /// arithmetic must stay in integer cents.
    pub fn times(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents * i64::from(quantity),
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl TryFrom<i64> for Money {
    type Error = DomainError;

    fn try_from(cents: i64) -> Result<Self, Self::Error> {
        Money::new(cents)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.cents
    }
}
