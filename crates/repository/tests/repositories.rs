//! Repository behavior against the in-memory store backend.

use domain::{
    Customer, CustomerId, Email, Money, Order, OrderId, OrderItem, OrderStatus, Product, ProductId,
};
use repository::mapping::{self, ATTR_EMAIL, ATTR_PRICE};
use repository::{CustomerRepository, OrderRepository, ProductRepository, RepositoryError};
use table_store::{AttrValue, InMemoryTableStore, TableStore};

fn customer(id: &str, email: &str) -> Customer {
    Customer::new(
        CustomerId::new(id).unwrap(),
        Email::new(email).unwrap(),
        "Ada Lovelace",
    )
}

fn product(id: &str, price: i64, stock: u32) -> Product {
    Product::new(
        ProductId::new(id).unwrap(),
        "Widget",
        "A widget",
        Money::new(price).unwrap(),
        stock,
    )
    .unwrap()
}

fn order(id: &str, customer_id: &str) -> Order {
    let items = vec![
        OrderItem::new(ProductId::new("p1").unwrap(), 2, Money::new(2999).unwrap()).unwrap(),
    ];
    Order::new(
        OrderId::new(id).unwrap(),
        CustomerId::new(customer_id).unwrap(),
        items,
    )
    .unwrap()
}

#[tokio::test]
async fn test_customer_round_trip_and_email_lookup() {
    let store = InMemoryTableStore::default();
    let repo = CustomerRepository::new(store);

    let original = customer("c1", "Ada.Lovelace@Example.COM");
    repo.save(&original).await.unwrap();

    let by_id = repo.find_by_id(original.id()).await.unwrap();
    assert_eq!(by_id, original);
    // Stored under the normalized form; lookup goes through GSI1.
    assert_eq!(by_id.email().as_str(), "ada.lovelace@example.com");

    let by_email = repo
        .find_by_email(&Email::new("ada.lovelace@example.com").unwrap())
        .await
        .unwrap();
    assert_eq!(by_email.id(), original.id());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_sequentially() {
    let store = InMemoryTableStore::default();
    let repo = CustomerRepository::new(store);

    repo.save(&customer("c1", "ada@example.com")).await.unwrap();

    let err = repo
        .save(&customer("c2", "ada@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::DuplicateEmail(_)));

    // Re-saving the same customer under its own email is an update, not
    // a duplicate.
    let mut same = repo
        .find_by_id(&CustomerId::new("c1").unwrap())
        .await
        .unwrap();
    same.update_name("Ada King");
    repo.save(&same).await.unwrap();
}

#[tokio::test]
async fn test_customer_list_paginates_with_cursor() {
    let store = InMemoryTableStore::default();
    let repo = CustomerRepository::new(store);

    for i in 0..5 {
        repo.save(&customer(&format!("c{i}"), &format!("ada{i}@example.com")))
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor = None;
    loop {
        let page = repo.find_all(2, cursor).await.unwrap();
        assert!(page.items.len() <= 2);
        seen.extend(page.items.into_iter().map(|c| c.id().to_string()));
        match page.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    assert_eq!(seen, vec!["c0", "c1", "c2", "c3", "c4"]);
}

#[tokio::test]
async fn test_missing_entities_surface_not_found() {
    let store = InMemoryTableStore::default();
    let customers = CustomerRepository::new(store.clone());
    let products = ProductRepository::new(store.clone());
    let orders = OrderRepository::new(store);

    let err = customers
        .find_by_id(&CustomerId::new("ghost").unwrap())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = products
        .delete(&ProductId::new("ghost").unwrap())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert!(!orders.exists(&OrderId::new("ghost").unwrap()).await.unwrap());
}

#[tokio::test]
async fn test_product_list_paginates_with_cursor() {
    let store = InMemoryTableStore::default();
    let repo = ProductRepository::new(store);

    for i in 0..5 {
        repo.save(&product(&format!("p{i}"), 1000 + i, 3))
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor = None;
    loop {
        let page = repo.find_all(2, cursor).await.unwrap();
        assert!(page.items.len() <= 2);
        seen.extend(page.items.into_iter().map(|p| p.id().to_string()));
        match page.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    assert_eq!(seen, vec!["p0", "p1", "p2", "p3", "p4"]);
}

#[tokio::test]
async fn test_in_stock_listing_excludes_exhausted_products() {
    let store = InMemoryTableStore::default();
    let repo = ProductRepository::new(store);

    repo.save(&product("p1", 500, 4)).await.unwrap();
    repo.save(&product("p2", 500, 0)).await.unwrap();

    let page = repo.find_in_stock(10, None).await.unwrap();
    let ids: Vec<_> = page.items.iter().map(|p| p.id().as_str()).collect();
    assert_eq!(ids, vec!["p1"]);
}

#[tokio::test]
async fn test_reserve_stock_decrements_and_guards_against_overdraw() {
    let store = InMemoryTableStore::default();
    let repo = ProductRepository::new(store);

    repo.save(&product("p1", 500, 3)).await.unwrap();

    let reserved = repo
        .reserve_stock(&ProductId::new("p1").unwrap(), 2)
        .await
        .unwrap();
    assert_eq!(reserved.stock(), 1);

    let err = repo
        .reserve_stock(&ProductId::new("p1").unwrap(), 5)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Domain(domain::DomainError::InsufficientStock {
            available: 1,
            requested: 5,
        })
    ));

    // A failed reservation leaves the stored stock untouched.
    let stored = repo
        .find_by_id(&ProductId::new("p1").unwrap())
        .await
        .unwrap();
    assert_eq!(stored.stock(), 1);
}

#[tokio::test]
async fn test_orders_list_by_customer_in_chronological_order() {
    let store = InMemoryTableStore::default();
    let repo = OrderRepository::new(store);

    // Distinct creation instants so the GSI1 sort key decides the order.
    let early = Order::restore(
        OrderId::new("o-early").unwrap(),
        CustomerId::new("c1").unwrap(),
        vec![OrderItem::new(ProductId::new("p1").unwrap(), 1, Money::new(100).unwrap()).unwrap()],
        OrderStatus::Pending,
        "2024-01-01T00:00:00Z".parse().unwrap(),
        "2024-01-01T00:00:00Z".parse().unwrap(),
    )
    .unwrap();
    let late = Order::restore(
        OrderId::new("o-late").unwrap(),
        CustomerId::new("c1").unwrap(),
        vec![OrderItem::new(ProductId::new("p1").unwrap(), 1, Money::new(100).unwrap()).unwrap()],
        OrderStatus::Pending,
        "2024-06-01T00:00:00Z".parse().unwrap(),
        "2024-06-01T00:00:00Z".parse().unwrap(),
    )
    .unwrap();
    let other = order("o-other", "c2");

    repo.save(&late).await.unwrap();
    repo.save(&early).await.unwrap();
    repo.save(&other).await.unwrap();

    let page = repo
        .find_by_customer(&CustomerId::new("c1").unwrap(), 10, None)
        .await
        .unwrap();
    let ids: Vec<_> = page.items.iter().map(|o| o.id().as_str()).collect();
    assert_eq!(ids, vec!["o-early", "o-late"]);
}

#[tokio::test]
async fn test_orders_list_by_status() {
    let store = InMemoryTableStore::default();
    let repo = OrderRepository::new(store);

    let mut confirmed = order("o1", "c1");
    confirmed.confirm().unwrap();
    repo.save(&confirmed).await.unwrap();
    repo.save(&order("o2", "c1")).await.unwrap();

    let page = repo
        .find_by_status(OrderStatus::Confirmed, 10, None)
        .await
        .unwrap();
    let ids: Vec<_> = page.items.iter().map(|o| o.id().as_str()).collect();
    assert_eq!(ids, vec!["o1"]);
}

#[tokio::test]
async fn test_orders_list_by_customer_and_status() {
    let store = InMemoryTableStore::default();
    let repo = OrderRepository::new(store);

    let mut shipped = order("o1", "c1");
    shipped.confirm().unwrap();
    shipped.ship().unwrap();
    repo.save(&shipped).await.unwrap();
    repo.save(&order("o2", "c1")).await.unwrap();

    // Another customer's shipped order must not leak into c1's listing.
    let mut foreign = order("o3", "c2");
    foreign.confirm().unwrap();
    foreign.ship().unwrap();
    repo.save(&foreign).await.unwrap();

    let page = repo
        .find_by_customer_and_status(
            &CustomerId::new("c1").unwrap(),
            OrderStatus::Shipped,
            10,
            None,
        )
        .await
        .unwrap();
    let ids: Vec<_> = page.items.iter().map(|o| o.id().as_str()).collect();
    assert_eq!(ids, vec!["o1"]);

    let none = repo
        .find_by_customer_and_status(
            &CustomerId::new("c1").unwrap(),
            OrderStatus::Delivered,
            10,
            None,
        )
        .await
        .unwrap();
    assert!(none.items.is_empty());
}

#[tokio::test]
async fn test_corrupt_record_fails_point_lookup_but_is_skipped_in_lists() {
    let store = InMemoryTableStore::default();
    let repo = ProductRepository::new(store.clone());

    repo.save(&product("p1", 500, 2)).await.unwrap();
    repo.save(&product("p2", 500, 2)).await.unwrap();

    // Corrupt p1 in place: a string where the price number belongs.
    let key = mapping::product_key(&ProductId::new("p1").unwrap());
    let mut raw = store.get(&key).await.unwrap().unwrap();
    raw.insert(ATTR_PRICE.to_string(), AttrValue::S("cheap".into()));
    store.put(raw).await.unwrap();

    let err = repo
        .find_by_id(&ProductId::new("p1").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::CorruptRecord { .. }));

    let page = repo.find_all(10, None).await.unwrap();
    let ids: Vec<_> = page.items.iter().map(|p| p.id().as_str()).collect();
    assert_eq!(ids, vec!["p2"]);
}

#[tokio::test]
async fn test_corrupt_email_record_fails_reconstruction() {
    let store = InMemoryTableStore::default();
    let repo = CustomerRepository::new(store.clone());

    repo.save(&customer("c1", "ada@example.com")).await.unwrap();

    let key = mapping::customer_key(&CustomerId::new("c1").unwrap());
    let mut raw = store.get(&key).await.unwrap().unwrap();
    raw.insert(ATTR_EMAIL.to_string(), AttrValue::S("not-an-email".into()));
    store.put(raw).await.unwrap();

    let err = repo
        .find_by_id(&CustomerId::new("c1").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::CorruptRecord { .. }));
}
