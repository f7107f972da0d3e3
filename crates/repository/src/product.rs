//! Product repository.

use domain::{Product, ProductId};
use table_store::{
    Cursor, FilterCond, PutCondition, Query, Scan, TableIndex, TableStore,
};

use crate::error::{RepositoryError, Result};
use crate::mapping::{self, ATTR_STOCK, ATTR_TYPE, EntityType, PRODUCT_ALL_PARTITION, product_key};
use crate::pages::{Paged, decode_page};

/// Persistence operations for products.
pub struct ProductRepository<S> {
    store: S,
}

impl<S: TableStore> ProductRepository<S> {
    /// Creates a repository over the given store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates or updates a product.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id()))]
    pub async fn save(&self, product: &Product) -> Result<()> {
        self.store.put(mapping::product::to_item(product)).await?;
        Ok(())
    }

    /// Point-reads a product by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &ProductId) -> Result<Product> {
        let key = product_key(id);
        match self.store.get(&key).await? {
            Some(item) => {
                mapping::product::from_item(&item).map_err(|source| {
                    RepositoryError::CorruptRecord {
                        entity: "product",
                        key: key.pk.clone(),
                        source,
                    }
                })
            }
            None => Err(RepositoryError::NotFound {
                entity: "product",
                id: id.to_string(),
            }),
        }
    }

    /// Lists all products through the `PRODUCT#ALL` GSI1 partition.
    #[tracing::instrument(skip(self, cursor))]
    pub async fn find_all(&self, limit: u32, cursor: Option<Cursor>) -> Result<Paged<Product>> {
        let page = self
            .store
            .query(
                Query::partition(TableIndex::Gsi1, PRODUCT_ALL_PARTITION)
                    .limit(limit)
                    .cursor(cursor),
            )
            .await?;
        Ok(decode_page("product", page, mapping::product::from_item))
    }

    /// Lists products currently in stock via a filtered scan.
    #[tracing::instrument(skip(self, cursor))]
    pub async fn find_in_stock(
        &self,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<Paged<Product>> {
        let page = self
            .store
            .scan(
                Scan::filtered(vec![
                    FilterCond::Equals(ATTR_TYPE, EntityType::Product.as_str().into()),
                    FilterCond::GreaterThan(ATTR_STOCK, 0),
                ])
                .limit(limit)
                .cursor(cursor),
            )
            .await?;
        Ok(decode_page("product", page, mapping::product::from_item))
    }

    /// Deletes a product, failing when absent.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<()> {
        if !self.store.delete(&product_key(id)).await? {
            return Err(RepositoryError::NotFound {
                entity: "product",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Returns true if a product exists under the id.
    pub async fn exists(&self, id: &ProductId) -> Result<bool> {
        match self.find_by_id(id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Atomically reserves stock: loads the product, applies the domain
    /// guard, and writes back under a compare-and-swap on the stock
    /// value that was read. An interleaved writer fails the condition
    /// instead of silently overselling; the caller decides whether to
    /// retry. Returns the product as written.
    #[tracing::instrument(skip(self))]
    pub async fn reserve_stock(&self, id: &ProductId, quantity: u32) -> Result<Product> {
        let mut product = self.find_by_id(id).await?;
        let observed = i64::from(product.stock());
        product.reserve_stock(quantity)?;
        self.store
            .put_if(
                mapping::product::to_item(&product),
                PutCondition::NumberEquals(ATTR_STOCK, observed),
            )
            .await?;
        tracing::debug!(remaining = product.stock(), "stock reserved");
        Ok(product)
    }
}
