//! Product CRUD service.

use domain::{Money, Product, ProductId};
use repository::{Paged, ProductRepository};
use table_store::{Cursor, TableStore};

use crate::error::Result;

/// Fields of a product update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<u32>,
}

/// Product catalog operations.
pub struct ProductService<S> {
    repo: ProductRepository<S>,
}

impl<S: TableStore> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: ProductRepository::new(store),
        }
    }

    /// Adds a product to the catalog under a system-generated id.
    #[tracing::instrument(skip_all)]
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        price_cents: i64,
        stock: u32,
    ) -> Result<Product> {
        let product = Product::new(
            ProductId::generate(),
            name,
            description,
            Money::new(price_cents)?,
            stock,
        )?;
        self.repo.save(&product).await?;
        tracing::info!(product_id = %product.id(), "product created");
        Ok(product)
    }

    pub async fn get(&self, id: &ProductId) -> Result<Product> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Lists the catalog, one page at a time.
    pub async fn list(&self, limit: u32, cursor: Option<Cursor>) -> Result<Paged<Product>> {
        Ok(self.repo.find_all(limit, cursor).await?)
    }

    /// Lists only products with stock on hand.
    pub async fn list_in_stock(
        &self,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<Paged<Product>> {
        Ok(self.repo.find_in_stock(limit, cursor).await?)
    }

    /// Applies a partial update and persists the result.
    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: &ProductId, update: UpdateProduct) -> Result<Product> {
        let mut product = self.repo.find_by_id(id).await?;
        if update.name.is_some() || update.description.is_some() {
            let name = update.name.unwrap_or_else(|| product.name().to_string());
            let description = update
                .description
                .unwrap_or_else(|| product.description().to_string());
            product.update_details(name, description)?;
        }
        if let Some(cents) = update.price_cents {
            product.update_price(Money::new(cents)?);
        }
        if let Some(stock) = update.stock {
            product.update_stock(stock);
        }
        self.repo.save(&product).await?;
        Ok(product)
    }

    /// Adds units to the stock level.
    #[tracing::instrument(skip(self))]
    pub async fn restock(&self, id: &ProductId, amount: u32) -> Result<Product> {
        let mut product = self.repo.find_by_id(id).await?;
        product.add_stock(amount);
        self.repo.save(&product).await?;
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<()> {
        self.repo.delete(id).await?;
        tracing::info!("product deleted");
        Ok(())
    }
}
