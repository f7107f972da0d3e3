//! Order repository.

use domain::{CustomerId, Order, OrderId, OrderStatus};
use table_store::{Cursor, FilterCond, Query, Scan, TableIndex, TableStore};

use crate::error::{RepositoryError, Result};
use crate::mapping::{
    self, ATTR_STATUS, ATTR_TYPE, EntityType, customer_orders_partition, order_key,
};
use crate::pages::{Paged, decode_page};

/// Persistence operations for orders.
pub struct OrderRepository<S> {
    store: S,
}

impl<S: TableStore> OrderRepository<S> {
    /// Creates a repository over the given store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates or updates an order.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn save(&self, order: &Order) -> Result<()> {
        let item = mapping::order::to_item(order).map_err(|source| {
            RepositoryError::CorruptRecord {
                entity: "order",
                key: order.id().to_string(),
                source,
            }
        })?;
        self.store.put(item).await?;
        Ok(())
    }

    /// Point-reads an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &OrderId) -> Result<Order> {
        let key = order_key(id);
        match self.store.get(&key).await? {
            Some(item) => mapping::order::from_item(&item).map_err(|source| {
                RepositoryError::CorruptRecord {
                    entity: "order",
                    key: key.pk.clone(),
                    source,
                }
            }),
            None => Err(RepositoryError::NotFound {
                entity: "order",
                id: id.to_string(),
            }),
        }
    }

    /// Lists a customer's orders, time-ordered, through GSI1.
    #[tracing::instrument(skip(self, cursor))]
    pub async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<Paged<Order>> {
        let page = self
            .store
            .query(
                Query::partition(TableIndex::Gsi1, customer_orders_partition(customer_id))
                    .sort_prefix("ORDER#")
                    .limit(limit)
                    .cursor(cursor),
            )
            .await?;
        Ok(decode_page("order", page, mapping::order::from_item))
    }

    /// Lists a customer's orders in a given status: the customer's GSI1
    /// partition narrowed by a status filter. Pages may come back short
    /// when the filter drops items; the cursor still advances.
    #[tracing::instrument(skip(self, cursor))]
    pub async fn find_by_customer_and_status(
        &self,
        customer_id: &CustomerId,
        status: OrderStatus,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<Paged<Order>> {
        let page = self
            .store
            .query(
                Query::partition(TableIndex::Gsi1, customer_orders_partition(customer_id))
                    .sort_prefix("ORDER#")
                    .filter(FilterCond::Equals(ATTR_STATUS, status.as_str().into()))
                    .limit(limit)
                    .cursor(cursor),
            )
            .await?;
        Ok(decode_page("order", page, mapping::order::from_item))
    }

    /// Lists orders with a given status via a filtered scan. Status has
    /// no dedicated index; this is the predicate-based retrieval path.
    #[tracing::instrument(skip(self, cursor))]
    pub async fn find_by_status(
        &self,
        status: OrderStatus,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<Paged<Order>> {
        let page = self
            .store
            .scan(
                Scan::filtered(vec![
                    FilterCond::Equals(ATTR_TYPE, EntityType::Order.as_str().into()),
                    FilterCond::Equals(ATTR_STATUS, status.as_str().into()),
                ])
                .limit(limit)
                .cursor(cursor),
            )
            .await?;
        Ok(decode_page("order", page, mapping::order::from_item))
    }

    /// Deletes an order, failing when absent.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &OrderId) -> Result<()> {
        if !self.store.delete(&order_key(id)).await? {
            return Err(RepositoryError::NotFound {
                entity: "order",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Returns true if an order exists under the id.
    pub async fn exists(&self, id: &OrderId) -> Result<bool> {
        match self.find_by_id(id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
