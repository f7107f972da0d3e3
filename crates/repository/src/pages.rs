//! Shared page decoding for multi-item queries.

use table_store::{Cursor, Item, Page};

use crate::error::MappingError;

/// One page of decoded entities plus the continuation cursor, if any.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub cursor: Option<Cursor>,
}

/// Decodes a raw page, skipping records that fail to reconstruct.
///
/// Single-item lookups fail hard on a corrupt record; multi-item queries
/// skip it and continue, but the skip is never silent: each one is
/// logged and counted so operators can alert on it.
pub(crate) fn decode_page<T>(
    entity: &'static str,
    page: Page,
    decode: impl Fn(&Item) -> Result<T, MappingError>,
) -> Paged<T> {
    let mut items = Vec::with_capacity(page.items.len());
    for raw in &page.items {
        match decode(raw) {
            Ok(decoded) => items.push(decoded),
            Err(err) => {
                tracing::warn!(entity, error = %err, "skipping corrupt record in multi-item query");
                metrics::counter!("corrupt_records_skipped_total", "entity" => entity).increment(1);
            }
        }
    }
    Paged {
        items,
        cursor: page.cursor,
    }
}
