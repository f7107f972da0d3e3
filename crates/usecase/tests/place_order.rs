//! End-to-end order placement against the in-memory store.

use std::sync::Arc;

use domain::{CustomerId, OrderStatus, ProductId};
use table_store::{
    ATTR_PK, AttrValue, InMemoryTableStore, Item, Key, Page, PutCondition, Query, Scan, StoreError,
    TableStore,
};
use usecase::{
    CustomerService, OrderLine, OrderService, PlaceOrder, PlaceOrderRequest, ProductService,
    UseCaseError,
};

struct Fixture {
    store: InMemoryTableStore,
    customers: CustomerService<InMemoryTableStore>,
    products: ProductService<InMemoryTableStore>,
    orders: OrderService<InMemoryTableStore>,
    place_order: PlaceOrder<InMemoryTableStore>,
}

fn fixture() -> Fixture {
    let store = InMemoryTableStore::default();
    Fixture {
        customers: CustomerService::new(store.clone()),
        products: ProductService::new(store.clone()),
        orders: OrderService::new(store.clone()),
        place_order: PlaceOrder::new(store.clone()),
        store,
    }
}

#[tokio::test]
async fn test_placing_an_order_snapshots_prices_and_reserves_stock() {
    let f = fixture();
    let customer = f.customers.create("ann@example.com", "Ann").await.unwrap();
    let keyboard = f.products.create("Keyboard", "87 keys", 2999, 10).await.unwrap();
    let mouse = f.products.create("Mouse", "2 buttons", 1000, 5).await.unwrap();

    let order = f
        .place_order
        .execute(PlaceOrderRequest {
            customer_id: customer.id().clone(),
            lines: vec![
                OrderLine {
                    product_id: keyboard.id().clone(),
                    quantity: 2,
                },
                OrderLine {
                    product_id: mouse.id().clone(),
                    quantity: 3,
                },
            ],
        })
        .await
        .unwrap();

    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.total().cents(), 2 * 2999 + 3 * 1000);
    assert_eq!(order.items()[0].unit_price().cents(), 2999);

    // Stock was decremented and the order is retrievable.
    assert_eq!(f.products.get(keyboard.id()).await.unwrap().stock(), 8);
    assert_eq!(f.products.get(mouse.id()).await.unwrap().stock(), 2);
    let stored = f.orders.get(order.id()).await.unwrap();
    assert_eq!(stored, order);

    // And it shows up in the customer's listing.
    let page = f
        .orders
        .list_by_customer(customer.id(), 10, None)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id(), order.id());
}

#[tokio::test]
async fn test_insufficient_stock_aborts_and_leaves_stock_untouched() {
    let f = fixture();
    let customer = f.customers.create("bob@example.com", "Bob").await.unwrap();
    let product = f.products.create("Widget", "", 500, 3).await.unwrap();

    let err = f
        .place_order
        .execute(PlaceOrderRequest {
            customer_id: customer.id().clone(),
            lines: vec![OrderLine {
                product_id: product.id().clone(),
                quantity: 5,
            }],
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UseCaseError::InsufficientStock {
            available: 3,
            requested: 5,
            ..
        }
    ));
    assert_eq!(f.products.get(product.id()).await.unwrap().stock(), 3);

    // Nothing was persisted for the failed placement.
    let page = f
        .orders
        .list_by_customer(customer.id(), 10, None)
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_unknown_customer_and_product_are_rejected() {
    let f = fixture();
    let customer = f.customers.create("cat@example.com", "Cat").await.unwrap();

    let err = f
        .place_order
        .execute(PlaceOrderRequest {
            customer_id: CustomerId::new("ghost").unwrap(),
            lines: vec![OrderLine {
                product_id: ProductId::new("p1").unwrap(),
                quantity: 1,
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::CustomerNotFound(_)));

    let err = f
        .place_order
        .execute(PlaceOrderRequest {
            customer_id: customer.id().clone(),
            lines: vec![OrderLine {
                product_id: ProductId::new("ghost").unwrap(),
                quantity: 1,
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::ProductNotFound(_)));
}

#[tokio::test]
async fn test_empty_order_is_rejected() {
    let f = fixture();
    let customer = f.customers.create("dee@example.com", "Dee").await.unwrap();

    let err = f
        .place_order
        .execute(PlaceOrderRequest {
            customer_id: customer.id().clone(),
            lines: vec![],
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_sequential_duplicate_email_is_rejected() {
    let f = fixture();
    f.customers.create("eve@example.com", "Eve").await.unwrap();

    let err = f
        .customers
        .create("eve@example.com", "Evil Eve")
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::DuplicateEmail(_)));
    assert_eq!(err.code(), "DUPLICATE_EMAIL");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_placements_never_oversell() {
    let f = fixture();
    let customer = f.customers.create("flo@example.com", "Flo").await.unwrap();
    // Stock covers exactly one of the competing orders.
    let product = f.products.create("Limited", "", 999, 5).await.unwrap();

    let place_order = Arc::new(PlaceOrder::new(f.store.clone()));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let place_order = Arc::clone(&place_order);
        let customer_id = customer.id().clone();
        let product_id = product.id().clone();
        handles.push(tokio::spawn(async move {
            place_order
                .execute(PlaceOrderRequest {
                    customer_id,
                    lines: vec![OrderLine {
                        product_id,
                        quantity: 5,
                    }],
                })
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            // Losers observe either the conflict (their CAS lost) or the
            // depleted stock (they read after the winner wrote).
            Err(UseCaseError::StockConflict(_)) | Err(UseCaseError::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected placement failure: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(f.products.get(product.id()).await.unwrap().stock(), 0);
}

#[tokio::test]
async fn test_order_status_lifecycle_through_the_service() {
    let f = fixture();
    let customer = f.customers.create("gus@example.com", "Gus").await.unwrap();
    let product = f.products.create("Thing", "", 100, 2).await.unwrap();

    let order = f
        .place_order
        .execute(PlaceOrderRequest {
            customer_id: customer.id().clone(),
            lines: vec![OrderLine {
                product_id: product.id().clone(),
                quantity: 1,
            }],
        })
        .await
        .unwrap();

    let order = f
        .orders
        .update_status(order.id(), OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Confirmed);

    // Skipping a step is an invalid transition and persists nothing.
    let err = f
        .orders
        .update_status(order.id(), OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
    assert_eq!(
        f.orders.get(order.id()).await.unwrap().status(),
        OrderStatus::Confirmed
    );

    let order = f
        .orders
        .update_status(order.id(), OrderStatus::Shipped)
        .await
        .unwrap();
    let order = f
        .orders
        .update_status(order.id(), OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Delivered);

    // A terminal order cannot be cancelled.
    let err = f
        .orders
        .update_status(order.id(), OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
}

/// Store wrapper failing every conditional put against one primary key,
/// simulating a CAS that always loses.
#[derive(Clone)]
struct LosingCas {
    inner: InMemoryTableStore,
    losing_pk: String,
}

#[async_trait::async_trait]
impl TableStore for LosingCas {
    async fn get(&self, key: &Key) -> table_store::Result<Option<Item>> {
        self.inner.get(key).await
    }

    async fn put(&self, item: Item) -> table_store::Result<()> {
        self.inner.put(item).await
    }

    async fn put_if(&self, item: Item, condition: PutCondition) -> table_store::Result<()> {
        if item.get(ATTR_PK).and_then(AttrValue::as_s) == Some(self.losing_pk.as_str()) {
            return Err(StoreError::ConditionFailed);
        }
        self.inner.put_if(item, condition).await
    }

    async fn delete(&self, key: &Key) -> table_store::Result<bool> {
        self.inner.delete(key).await
    }

    async fn query(&self, query: Query) -> table_store::Result<Page> {
        self.inner.query(query).await
    }

    async fn scan(&self, scan: Scan) -> table_store::Result<Page> {
        self.inner.scan(scan).await
    }
}

#[tokio::test]
async fn test_failed_line_aborts_without_compensating_earlier_lines() {
    let f = fixture();
    let customer = f.customers.create("hal@example.com", "Hal").await.unwrap();
    let plenty = f.products.create("Plenty", "", 100, 10).await.unwrap();
    let contended = f.products.create("Contended", "", 100, 5).await.unwrap();

    let store = LosingCas {
        inner: f.store.clone(),
        losing_pk: format!("PRODUCT#{}", contended.id()),
    };
    let place_order = PlaceOrder::new(store);

    let err = place_order
        .execute(PlaceOrderRequest {
            customer_id: customer.id().clone(),
            lines: vec![
                OrderLine {
                    product_id: plenty.id().clone(),
                    quantity: 2,
                },
                OrderLine {
                    product_id: contended.id().clone(),
                    quantity: 1,
                },
            ],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::StockConflict(_)));
    assert_eq!(err.code(), "STOCK_CONFLICT");

    // The first line's reservation stands; it is not compensated. No
    // order record was written.
    assert_eq!(f.products.get(plenty.id()).await.unwrap().stock(), 8);
    let page = f
        .orders
        .list_by_customer(customer.id(), 10, None)
        .await
        .unwrap();
    assert!(page.items.is_empty());
}
