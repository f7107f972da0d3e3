//! Key-mapping layer: bijective translation between entities and
//! physical items.
//!
//! Every entity's natural key is folded into the generic `(PK, SK)` pair
//! using the `{TYPE}#{id}` convention, and GSI1 carries the one secondary
//! access pattern each entity needs:
//!
//! | Entity   | PK / SK          | GSI1PK                  | GSI1SK                        |
//! |----------|------------------|-------------------------|-------------------------------|
//! | Customer | `CUSTOMER#{id}`  | `EMAIL#{email}`         | `CUSTOMER#{id}`               |
//! | Product  | `PRODUCT#{id}`   | `PRODUCT#ALL`           | `PRODUCT#{id}`                |
//! | Order    | `ORDER#{id}`     | `CUSTOMER#{customerId}` | `ORDER#{createdAt}#{orderId}` |
//!
//! This module only shapes data; it has no knowledge of the storage
//! engine's query API.

pub mod customer;
pub mod order;
pub mod product;

use chrono::{DateTime, SecondsFormat, Utc};
use domain::{CustomerId, Email, OrderId, ProductId};
use table_store::{AttrValue, Item, Key};

use crate::error::MappingError;

/// Name of the entity discriminator attribute.
pub const ATTR_TYPE: &str = "Type";
/// Entity identifier attribute.
pub const ATTR_ID: &str = "ID";
/// Customer email attribute.
pub const ATTR_EMAIL: &str = "Email";
/// Display name attribute (customer and product).
pub const ATTR_NAME: &str = "Name";
/// Product description attribute.
pub const ATTR_DESCRIPTION: &str = "Description";
/// Product price attribute, integer cents.
pub const ATTR_PRICE: &str = "Price";
/// Product stock attribute.
pub const ATTR_STOCK: &str = "Stock";
/// Owning customer attribute on orders.
pub const ATTR_CUSTOMER_ID: &str = "CustomerID";
/// Serialized order-lines attribute.
pub const ATTR_ITEMS: &str = "Items";
/// Order status attribute.
pub const ATTR_STATUS: &str = "Status";
/// Order total attribute, integer cents.
pub const ATTR_TOTAL: &str = "Total";
/// Creation timestamp attribute, RFC 3339.
pub const ATTR_CREATED_AT: &str = "CreatedAt";
/// Last-update timestamp attribute, RFC 3339.
pub const ATTR_UPDATED_AT: &str = "UpdatedAt";

/// GSI1 partition collecting every product for the list-all pattern.
pub const PRODUCT_ALL_PARTITION: &str = "PRODUCT#ALL";

/// The entity discriminator stored in [`ATTR_TYPE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Customer,
    Product,
    Order,
}

impl EntityType {
    /// Returns the discriminator string as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Customer => "CUSTOMER",
            EntityType::Product => "PRODUCT",
            EntityType::Order => "ORDER",
        }
    }

    /// Parses a stored discriminator.
    pub fn parse(s: &str) -> Result<Self, MappingError> {
        match s {
            "CUSTOMER" => Ok(EntityType::Customer),
            "PRODUCT" => Ok(EntityType::Product),
            "ORDER" => Ok(EntityType::Order),
            other => Err(MappingError::UnknownEntityType(other.to_string())),
        }
    }
}

/// Primary key of a customer item.
pub fn customer_key(id: &CustomerId) -> Key {
    let composite = format!("CUSTOMER#{id}");
    Key::new(composite.clone(), composite)
}

/// Primary key of a product item.
pub fn product_key(id: &ProductId) -> Key {
    let composite = format!("PRODUCT#{id}");
    Key::new(composite.clone(), composite)
}

/// Primary key of an order item.
pub fn order_key(id: &OrderId) -> Key {
    let composite = format!("ORDER#{id}");
    Key::new(composite.clone(), composite)
}

/// GSI1 partition of the customer uniqueness/lookup pattern.
pub fn email_partition(email: &Email) -> String {
    format!("EMAIL#{email}")
}

/// GSI1 partition collecting a customer's orders.
pub fn customer_orders_partition(id: &CustomerId) -> String {
    format!("CUSTOMER#{id}")
}

/// GSI1 sort key of an order: time-ordered within the owning customer's
/// partition. RFC 3339 UTC timestamps sort lexicographically in
/// chronological order.
pub fn order_sort_key(created_at: DateTime<Utc>, id: &OrderId) -> String {
    format!(
        "ORDER#{}#{id}",
        created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Decodes the discriminator first and rejects records of another type,
/// rather than guessing from entity-specific attributes.
pub(crate) fn expect_type(item: &Item, expected: EntityType) -> Result<(), MappingError> {
    let found = get_s(item, ATTR_TYPE)?;
    let parsed = EntityType::parse(found)?;
    if parsed != expected {
        return Err(MappingError::EntityTypeMismatch {
            expected: expected.as_str(),
            found: found.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn get_s<'a>(item: &'a Item, attr: &'static str) -> Result<&'a str, MappingError> {
    item.get(attr)
        .ok_or(MappingError::MissingAttribute(attr))?
        .as_s()
        .ok_or(MappingError::WrongType(attr))
}

pub(crate) fn get_n(item: &Item, attr: &'static str) -> Result<i64, MappingError> {
    item.get(attr)
        .ok_or(MappingError::MissingAttribute(attr))?
        .as_n()
        .ok_or(MappingError::WrongType(attr))
}

pub(crate) fn get_time(item: &Item, attr: &'static str) -> Result<DateTime<Utc>, MappingError> {
    let raw = get_s(item, attr)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| MappingError::Timestamp(attr))
}

pub(crate) fn put_s(item: &mut Item, attr: &str, value: impl Into<String>) {
    item.insert(attr.to_string(), AttrValue::S(value.into()));
}

pub(crate) fn put_n(item: &mut Item, attr: &str, value: i64) {
    item.insert(attr.to_string(), AttrValue::N(value));
}

pub(crate) fn put_time(item: &mut Item, attr: &str, value: DateTime<Utc>) {
    item.insert(attr.to_string(), AttrValue::S(value.to_rfc3339()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lookup_keys_are_uniform() {
        let key = customer_key(&CustomerId::new("c1").unwrap());
        assert_eq!(key.pk, "CUSTOMER#c1");
        assert_eq!(key.pk, key.sk);

        let key = product_key(&ProductId::new("p1").unwrap());
        assert_eq!(key.pk, "PRODUCT#p1");

        let key = order_key(&OrderId::new("o1").unwrap());
        assert_eq!(key.sk, "ORDER#o1");
    }

    #[test]
    fn test_order_sort_key_orders_chronologically() {
        let id = OrderId::new("o1").unwrap();
        let earlier = "2024-01-02T03:04:05Z".parse().unwrap();
        let later = "2024-06-02T03:04:05Z".parse().unwrap();
        assert!(order_sort_key(earlier, &id) < order_sort_key(later, &id));
        assert_eq!(
            order_sort_key(earlier, &id),
            "ORDER#2024-01-02T03:04:05Z#o1"
        );
    }

    #[test]
    fn test_unknown_discriminator_is_rejected() {
        let mut item = Item::new();
        put_s(&mut item, ATTR_TYPE, "WAREHOUSE");
        assert!(matches!(
            expect_type(&item, EntityType::Customer),
            Err(MappingError::UnknownEntityType(_))
        ));

        let mut item = Item::new();
        put_s(&mut item, ATTR_TYPE, "PRODUCT");
        assert!(matches!(
            expect_type(&item, EntityType::Customer),
            Err(MappingError::EntityTypeMismatch { .. })
        ));
    }
}
