//! Product entity with stock tracking.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value::{Money, ProductId};

/// A sellable product with a current price and stock level.
///
/// Stock is decremented only through [`Product::reserve_stock`]; the
/// unsigned representation makes a negative level unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Money,
    stock: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product, rejecting an empty name.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock: u32,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyValue {
                field: "product name",
            });
        }
        let now = Utc::now();
        Ok(Self {
            id,
            name,
            description: description.into(),
            price,
            stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrates a persisted product, preserving its timestamps.
    pub fn restore(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut product = Self::new(id, name, description, price, stock)?;
        product.created_at = created_at;
        product.updated_at = updated_at;
        Ok(product)
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the price and stamps `updated_at`.
    pub fn update_price(&mut self, price: Money) {
        self.price = price;
        self.updated_at = Utc::now();
    }

    /// Sets the stock level and stamps `updated_at`.
    pub fn update_stock(&mut self, stock: u32) {
        self.stock = stock;
        self.updated_at = Utc::now();
    }

    /// Increases the stock level.
    pub fn add_stock(&mut self, amount: u32) {
        self.stock += amount;
        self.updated_at = Utc::now();
    }

    /// Reserves stock for an order, failing if not enough is available.
    pub fn reserve_stock(&mut self, quantity: u32) -> Result<(), DomainError> {
        if self.stock < quantity {
            return Err(DomainError::InsufficientStock {
                available: self.stock,
                requested: quantity,
            });
        }
        self.stock -= quantity;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns true if at least `quantity` units are available.
    pub fn is_in_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Returns true if any stock is available.
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Replaces name and description, rejecting an empty name.
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyValue {
                field: "product name",
            });
        }
        self.name = name;
        self.description = description.into();
        self.updated_at = Utc::now();
        Ok(())
    }
}
