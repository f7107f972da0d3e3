//! Order aggregate: line items, derived total, and status transitions.

mod status;

pub use status::OrderStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value::{CustomerId, Money, OrderId, ProductId};

/// A line of an order, snapshotting the product price at placement time.
///
/// Serializes to the denormalized `{productId, quantity, unitPrice}` form
/// embedded in the persisted order record. Later product price changes do
/// not affect existing orders. Deserialization goes through
/// [`OrderItem::new`], so a persisted zero quantity or zero price is
/// rejected rather than reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "OrderItemRecord")]
pub struct OrderItem {
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemRecord {
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

impl TryFrom<OrderItemRecord> for OrderItem {
    type Error = DomainError;

    fn try_from(record: OrderItemRecord) -> Result<Self, Self::Error> {
        OrderItem::new(record.product_id, record.quantity, record.unit_price)
    }
}

impl OrderItem {
    /// Creates a line item, rejecting zero quantities and zero prices.
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::NonPositiveQuantity);
        }
        if !unit_price.is_positive() {
            return Err(DomainError::ZeroOrNegativePrice);
        }
        Ok(Self {
            product_id,
            quantity,
            unit_price,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns `quantity * unit_price` in integer cents.
    pub fn total_price(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// An order placed by a customer.
///
/// Items and total are fixed after creation; only the status (and the
/// `updated_at` stamp it carries) changes, through the transition methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
    status: OrderStatus,
    total: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order, rejecting an empty item list. The total
    /// is derived from the items and is never settable directly.
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
    ) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        let total = Self::sum_items(&items);
        let now = Utc::now();
        Ok(Self {
            id,
            customer_id,
            items,
            status: OrderStatus::Pending,
            total,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrates a persisted order, preserving status and timestamps.
    /// The total is recomputed from the items.
    pub fn restore(
        id: OrderId,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        status: OrderStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        let total = Self::sum_items(&items);
        Ok(Self {
            id,
            customer_id,
            items,
            status,
            total,
            created_at,
            updated_at,
        })
    }

    fn sum_items(items: &[OrderItem]) -> Money {
        items
            .iter()
            .fold(Money::zero(), |acc, item| acc.add(item.total_price()))
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(OrderItem::quantity).sum()
    }

    /// Transitions pending → confirmed.
    pub fn confirm(&mut self) -> Result<(), DomainError> {
        self.transition(OrderStatus::Pending, OrderStatus::Confirmed)
    }

    /// Transitions confirmed → shipped.
    pub fn ship(&mut self) -> Result<(), DomainError> {
        self.transition(OrderStatus::Confirmed, OrderStatus::Shipped)
    }

    /// Transitions shipped → delivered.
    pub fn deliver(&mut self) -> Result<(), DomainError> {
        self.transition(OrderStatus::Shipped, OrderStatus::Delivered)
    }

    /// Cancels the order from any non-terminal status.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.can_cancel() {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Cancelled,
            });
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn transition(&mut self, expected: OrderStatus, to: OrderStatus) -> Result<(), DomainError> {
        if self.status != expected {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}
