//! HTTP route handlers.

pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use serde::Serialize;
use table_store::Cursor;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Effective page size for a `limit` query parameter, clamped to the
/// maximum.
pub(crate) fn effective_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Parses an optional `cursor` query parameter.
pub(crate) fn cursor_param(cursor: Option<String>) -> Option<Cursor> {
    cursor.map(Cursor::from)
}

/// One page of response items plus the continuation token.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, cursor: Option<Cursor>) -> Self {
        Self {
            items,
            cursor: cursor.map(|c| c.to_string()),
        }
    }
}
