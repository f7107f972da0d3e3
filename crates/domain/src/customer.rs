//! Customer entity.

use chrono::{DateTime, Utc};

use crate::value::{CustomerId, Email};

/// A registered customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    email: Email,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new customer, stamping both timestamps to now.
    pub fn new(id: CustomerId, email: Email, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrates a persisted customer, preserving its timestamps.
    pub fn restore(
        id: CustomerId,
        email: Email,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name: name.into(),
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the email address and stamps `updated_at`.
    pub fn update_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Replaces the display name and stamps `updated_at`.
    pub fn update_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }
}
