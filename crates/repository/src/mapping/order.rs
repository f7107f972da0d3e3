//! Order ↔ item mapping.
//!
//! Order lines are denormalized into the record as a JSON string; the
//! stored `Total` is informational, the reconstructed total is always
//! recomputed from the lines.

use domain::{CustomerId, Order, OrderId, OrderItem, OrderStatus};
use table_store::{ATTR_GSI1_PK, ATTR_GSI1_SK, ATTR_PK, ATTR_SK, Item};

use super::{
    ATTR_CREATED_AT, ATTR_CUSTOMER_ID, ATTR_ID, ATTR_ITEMS, ATTR_STATUS, ATTR_TOTAL, ATTR_TYPE,
    ATTR_UPDATED_AT, EntityType, customer_orders_partition, expect_type, get_s, get_time,
    order_key, order_sort_key, put_n, put_s, put_time,
};
use crate::error::MappingError;

/// Shapes an order into its physical item. GSI1 places the order in its
/// owning customer's partition, sorted by creation time.
pub fn to_item(order: &Order) -> Result<Item, MappingError> {
    let key = order_key(order.id());
    let items_json = serde_json::to_string(order.items())?;

    let mut item = Item::new();
    put_s(&mut item, ATTR_PK, key.pk);
    put_s(&mut item, ATTR_SK, key.sk);
    put_s(
        &mut item,
        ATTR_GSI1_PK,
        customer_orders_partition(order.customer_id()),
    );
    put_s(
        &mut item,
        ATTR_GSI1_SK,
        order_sort_key(order.created_at(), order.id()),
    );
    put_s(&mut item, ATTR_TYPE, EntityType::Order.as_str());
    put_s(&mut item, ATTR_ID, order.id().as_str());
    put_s(&mut item, ATTR_CUSTOMER_ID, order.customer_id().as_str());
    put_s(&mut item, ATTR_ITEMS, items_json);
    put_s(&mut item, ATTR_STATUS, order.status().as_str());
    put_n(&mut item, ATTR_TOTAL, order.total().cents());
    put_time(&mut item, ATTR_CREATED_AT, order.created_at());
    put_time(&mut item, ATTR_UPDATED_AT, order.updated_at());
    Ok(item)
}

/// Reconstructs an order from its physical item. An unparseable items
/// payload, an unknown status, or any line failing its own validation is
/// a corrupt record.
pub fn from_item(item: &Item) -> Result<Order, MappingError> {
    expect_type(item, EntityType::Order)?;
    let id = OrderId::new(get_s(item, ATTR_ID)?)?;
    let customer_id = CustomerId::new(get_s(item, ATTR_CUSTOMER_ID)?)?;
    let lines: Vec<OrderItem> = serde_json::from_str(get_s(item, ATTR_ITEMS)?)?;
    let status: OrderStatus = get_s(item, ATTR_STATUS)?.parse()?;
    let created_at = get_time(item, ATTR_CREATED_AT)?;
    let updated_at = get_time(item, ATTR_UPDATED_AT)?;
    Ok(Order::restore(
        id,
        customer_id,
        lines,
        status,
        created_at,
        updated_at,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, ProductId};
    use table_store::AttrValue;

    fn order() -> Order {
        let items = vec![
            OrderItem::new(
                ProductId::new("prod-1").unwrap(),
                2,
                Money::new(2999).unwrap(),
            )
            .unwrap(),
            OrderItem::new(
                ProductId::new("prod-2").unwrap(),
                1,
                Money::new(499).unwrap(),
            )
            .unwrap(),
        ];
        Order::new(
            OrderId::new("order-1").unwrap(),
            CustomerId::new("cust-1").unwrap(),
            items,
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_all_observable_fields() {
        // Two distinct lines with differing unit prices.
        let original = order();
        let restored = from_item(&to_item(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.total().cents(), 2 * 2999 + 499);
    }

    #[test]
    fn test_keys_encode_the_by_customer_access_pattern() {
        let original = order();
        let item = to_item(&original).unwrap();
        assert_eq!(
            item.get(ATTR_GSI1_PK).unwrap().as_s().unwrap(),
            "CUSTOMER#cust-1"
        );
        let sort = item.get(ATTR_GSI1_SK).unwrap().as_s().unwrap();
        assert!(sort.starts_with("ORDER#"));
        assert!(sort.ends_with("#order-1"));
    }

    #[test]
    fn test_unparseable_items_payload_is_corrupt() {
        let mut item = to_item(&order()).unwrap();
        item.insert(ATTR_ITEMS.to_string(), AttrValue::S("{not json".into()));
        assert!(matches!(
            from_item(&item),
            Err(MappingError::ItemsPayload(_))
        ));
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let mut item = to_item(&order()).unwrap();
        item.insert(ATTR_STATUS.to_string(), AttrValue::S("archived".into()));
        assert!(matches!(from_item(&item), Err(MappingError::Domain(_))));
    }

    #[test]
    fn test_status_and_timestamps_survive_the_trip() {
        let mut original = order();
        original.confirm().unwrap();
        let restored = from_item(&to_item(&original).unwrap()).unwrap();
        assert_eq!(restored.status(), OrderStatus::Confirmed);
        assert_eq!(restored.updated_at(), original.updated_at());
    }
}
