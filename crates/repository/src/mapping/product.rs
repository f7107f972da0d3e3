//! Product ↔ item mapping.

use domain::{Money, Product, ProductId};
use table_store::{ATTR_GSI1_PK, ATTR_GSI1_SK, ATTR_PK, ATTR_SK, Item};

use super::{
    ATTR_CREATED_AT, ATTR_DESCRIPTION, ATTR_ID, ATTR_NAME, ATTR_PRICE, ATTR_STOCK, ATTR_TYPE,
    ATTR_UPDATED_AT, EntityType, PRODUCT_ALL_PARTITION, expect_type, get_n, get_s, get_time,
    product_key, put_n, put_s, put_time,
};
use crate::error::MappingError;

/// Shapes a product into its physical item. Every product lands in the
/// single `PRODUCT#ALL` GSI1 partition for the list-all pattern.
pub fn to_item(product: &Product) -> Item {
    let key = product_key(product.id());
    let mut item = Item::new();
    put_s(&mut item, ATTR_PK, key.pk);
    put_s(&mut item, ATTR_SK, key.sk);
    put_s(&mut item, ATTR_GSI1_PK, PRODUCT_ALL_PARTITION);
    put_s(&mut item, ATTR_GSI1_SK, format!("PRODUCT#{}", product.id()));
    put_s(&mut item, ATTR_TYPE, EntityType::Product.as_str());
    put_s(&mut item, ATTR_ID, product.id().as_str());
    put_s(&mut item, ATTR_NAME, product.name());
    put_s(&mut item, ATTR_DESCRIPTION, product.description());
    put_n(&mut item, ATTR_PRICE, product.price().cents());
    put_n(&mut item, ATTR_STOCK, i64::from(product.stock()));
    put_time(&mut item, ATTR_CREATED_AT, product.created_at());
    put_time(&mut item, ATTR_UPDATED_AT, product.updated_at());
    item
}

/// Reconstructs a product from its physical item. A persisted price
/// below zero or a non-representable stock count is a corrupt record.
pub fn from_item(item: &Item) -> Result<Product, MappingError> {
    expect_type(item, EntityType::Product)?;
    let id = ProductId::new(get_s(item, ATTR_ID)?)?;
    let name = get_s(item, ATTR_NAME)?;
    let description = get_s(item, ATTR_DESCRIPTION)?;
    let price = Money::new(get_n(item, ATTR_PRICE)?)?;
    let stock = u32::try_from(get_n(item, ATTR_STOCK)?)
        .map_err(|_| MappingError::WrongType(ATTR_STOCK))?;
    let created_at = get_time(item, ATTR_CREATED_AT)?;
    let updated_at = get_time(item, ATTR_UPDATED_AT)?;
    Ok(Product::restore(
        id,
        name,
        description,
        price,
        stock,
        created_at,
        updated_at,
    )?)
}
