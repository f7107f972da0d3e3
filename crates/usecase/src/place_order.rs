//! The order-placement orchestrator.
//!
//! Placement is a sequence of single-item operations, not a transaction:
//! verify the customer, snapshot prices, reserve stock line by line under
//! a compare-and-swap, then persist the order. Any failure aborts the
//! remaining steps; stock already reserved for earlier lines is not
//! compensated.

use domain::{CustomerId, DomainError, Order, OrderId, OrderItem, ProductId};
use repository::{CustomerRepository, OrderRepository, ProductRepository, RepositoryError};
use table_store::{StoreError, TableStore};

use crate::error::{Result, UseCaseError};

/// One requested order line: the product and how many units.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A request to place an order for an existing customer.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLine>,
}

/// Places orders against the shared store.
pub struct PlaceOrder<S> {
    customers: CustomerRepository<S>,
    products: ProductRepository<S>,
    orders: OrderRepository<S>,
}

impl<S: TableStore + Clone> PlaceOrder<S> {
    /// Creates the orchestrator over one store handle.
    pub fn new(store: S) -> Self {
        Self {
            customers: CustomerRepository::new(store.clone()),
            products: ProductRepository::new(store.clone()),
            orders: OrderRepository::new(store),
        }
    }

    /// Runs the placement, returning the persisted pending order.
    #[tracing::instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn execute(&self, request: PlaceOrderRequest) -> Result<Order> {
        match self.place(request).await {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id(),
                    total_cents = order.total().cents(),
                    lines = order.items().len(),
                    "order placed"
                );
                metrics::counter!("orders_placed_total").increment(1);
                Ok(order)
            }
            Err(err) => {
                tracing::warn!(error = %err, code = err.code(), "order placement failed");
                metrics::counter!("order_placement_failures_total", "code" => err.code())
                    .increment(1);
                Err(err)
            }
        }
    }

    async fn place(&self, request: PlaceOrderRequest) -> Result<Order> {
        if request.lines.is_empty() {
            return Err(DomainError::EmptyOrder.into());
        }

        let customer = self.customers.find_by_id(&request.customer_id).await?;

        // Snapshot each line at the product's current price. The stock
        // check here is advisory; the reservation below is what holds.
        let mut items = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let product = self.products.find_by_id(&line.product_id).await?;
            if !product.is_in_stock(line.quantity) {
                return Err(UseCaseError::InsufficientStock {
                    product_id: line.product_id.to_string(),
                    available: product.stock(),
                    requested: line.quantity,
                });
            }
            items.push(OrderItem::new(
                line.product_id.clone(),
                line.quantity,
                product.price(),
            )?);
        }

        let order = Order::new(OrderId::generate(), customer.id().clone(), items)?;

        // Reserve line by line. Earlier reservations stand if a later
        // line fails.
        for line in &request.lines {
            self.products
                .reserve_stock(&line.product_id, line.quantity)
                .await
                .map_err(|err| reservation_error(&line.product_id, err))?;
        }

        self.orders.save(&order).await?;
        Ok(order)
    }
}

/// Attaches the product to reservation failures: a failed CAS becomes a
/// stock conflict, a failed domain guard keeps its counts.
fn reservation_error(product_id: &ProductId, err: RepositoryError) -> UseCaseError {
    match err {
        RepositoryError::Store(StoreError::ConditionFailed) => {
            UseCaseError::StockConflict(product_id.to_string())
        }
        RepositoryError::Domain(DomainError::InsufficientStock {
            available,
            requested,
        }) => UseCaseError::InsufficientStock {
            product_id: product_id.to_string(),
            available,
            requested,
        },
        other => other.into(),
    }
}
