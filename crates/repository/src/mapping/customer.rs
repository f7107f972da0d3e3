//! Customer ↔ item mapping.

use domain::{Customer, CustomerId, Email};
use table_store::{ATTR_GSI1_PK, ATTR_GSI1_SK, ATTR_PK, ATTR_SK, Item};

use super::{
    ATTR_CREATED_AT, ATTR_EMAIL, ATTR_ID, ATTR_NAME, ATTR_TYPE, ATTR_UPDATED_AT, EntityType,
    customer_key, email_partition, expect_type, get_s, get_time, put_s, put_time,
};
use crate::error::MappingError;

/// Shapes a customer into its physical item, including the GSI1 keys for
/// the lookup-by-email pattern.
pub fn to_item(customer: &Customer) -> Item {
    let key = customer_key(customer.id());
    let mut item = Item::new();
    put_s(&mut item, ATTR_PK, key.pk);
    put_s(&mut item, ATTR_SK, key.sk);
    put_s(&mut item, ATTR_GSI1_PK, email_partition(customer.email()));
    put_s(&mut item, ATTR_GSI1_SK, format!("CUSTOMER#{}", customer.id()));
    put_s(&mut item, ATTR_TYPE, EntityType::Customer.as_str());
    put_s(&mut item, ATTR_ID, customer.id().as_str());
    put_s(&mut item, ATTR_EMAIL, customer.email().as_str());
    put_s(&mut item, ATTR_NAME, customer.name());
    put_time(&mut item, ATTR_CREATED_AT, customer.created_at());
    put_time(&mut item, ATTR_UPDATED_AT, customer.updated_at());
    item
}

/// Reconstructs a customer from its physical item.
pub fn from_item(item: &Item) -> Result<Customer, MappingError> {
    expect_type(item, EntityType::Customer)?;
    let id = CustomerId::new(get_s(item, ATTR_ID)?)?;
    let email = Email::new(get_s(item, ATTR_EMAIL)?)?;
    let name = get_s(item, ATTR_NAME)?;
    let created_at = get_time(item, ATTR_CREATED_AT)?;
    let updated_at = get_time(item, ATTR_UPDATED_AT)?;
    Ok(Customer::restore(id, email, name, created_at, updated_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_store::AttrValue;

    fn customer() -> Customer {
        Customer::new(
            CustomerId::new("cust-1").unwrap(),
            Email::new("Ann.Smith@Example.com").unwrap(),
            "Ann",
        )
    }

    #[test]
    fn test_round_trip_preserves_all_observable_fields() {
        let original = customer();
        let restored = from_item(&to_item(&original)).unwrap();
        assert_eq!(restored, original);
        // The mixed-case input must normalize identically both directions.
        assert_eq!(restored.email().as_str(), "ann.smith@example.com");
    }

    #[test]
    fn test_keys_encode_the_email_access_pattern() {
        let item = to_item(&customer());
        assert_eq!(
            item.get(table_store::ATTR_PK).unwrap().as_s().unwrap(),
            "CUSTOMER#cust-1"
        );
        assert_eq!(
            item.get(ATTR_GSI1_PK).unwrap().as_s().unwrap(),
            "EMAIL#ann.smith@example.com"
        );
        assert_eq!(
            item.get(ATTR_GSI1_SK).unwrap().as_s().unwrap(),
            "CUSTOMER#cust-1"
        );
    }

    #[test]
    fn test_missing_attribute_is_corrupt() {
        let mut item = to_item(&customer());
        item.remove(ATTR_EMAIL);
        assert!(matches!(
            from_item(&item),
            Err(MappingError::MissingAttribute(ATTR_EMAIL))
        ));
    }

    #[test]
    fn test_invalid_email_is_corrupt() {
        let mut item = to_item(&customer());
        item.insert(ATTR_EMAIL.to_string(), AttrValue::S("not-an-email".into()));
        assert!(matches!(from_item(&item), Err(MappingError::Domain(_))));
    }
}
