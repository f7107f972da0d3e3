//! Order query and lifecycle service. Placement itself lives in
//! [`crate::place_order`].

use domain::{CustomerId, DomainError, Order, OrderId, OrderStatus};
use repository::{OrderRepository, Paged};
use table_store::{Cursor, TableStore};

use crate::error::Result;

/// Order retrieval and status transitions.
pub struct OrderService<S> {
    repo: OrderRepository<S>,
}

impl<S: TableStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: OrderRepository::new(store),
        }
    }

    pub async fn get(&self, id: &OrderId) -> Result<Order> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Lists a customer's orders, oldest first.
    pub async fn list_by_customer(
        &self,
        customer_id: &CustomerId,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<Paged<Order>> {
        Ok(self.repo.find_by_customer(customer_id, limit, cursor).await?)
    }

    /// Lists a customer's orders narrowed to a given status.
    pub async fn list_by_customer_and_status(
        &self,
        customer_id: &CustomerId,
        status: OrderStatus,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<Paged<Order>> {
        Ok(self
            .repo
            .find_by_customer_and_status(customer_id, status, limit, cursor)
            .await?)
    }

    /// Lists orders in a given status.
    pub async fn list_by_status(
        &self,
        status: OrderStatus,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<Paged<Order>> {
        Ok(self.repo.find_by_status(status, limit, cursor).await?)
    }

    /// Drives the order to `target` through the state machine and
    /// persists the result. Moving back to pending is never valid.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: &OrderId, target: OrderStatus) -> Result<Order> {
        let mut order = self.repo.find_by_id(id).await?;
        match target {
            OrderStatus::Confirmed => order.confirm()?,
            OrderStatus::Shipped => order.ship()?,
            OrderStatus::Delivered => order.deliver()?,
            OrderStatus::Cancelled => order.cancel()?,
            OrderStatus::Pending => {
                return Err(DomainError::InvalidTransition {
                    from: order.status(),
                    to: OrderStatus::Pending,
                }
                .into());
            }
        }
        self.repo.save(&order).await?;
        tracing::info!(status = %target.as_str(), "order status updated");
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &OrderId) -> Result<()> {
        self.repo.delete(id).await?;
        Ok(())
    }
}
