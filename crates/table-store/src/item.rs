//! Schema-less item model shared by all backends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name of the base-table partition key attribute.
pub const ATTR_PK: &str = "PK";
/// Name of the base-table sort key attribute.
pub const ATTR_SK: &str = "SK";
/// Name of the GSI1 partition key attribute.
pub const ATTR_GSI1_PK: &str = "GSI1PK";
/// Name of the GSI1 sort key attribute.
pub const ATTR_GSI1_SK: &str = "GSI1SK";

/// A scalar attribute value.
///
/// Numbers are integer-only: every numeric attribute in the schema
/// (prices in cents, stock counts) is an integer by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    /// String value.
    S(String),
    /// Integer value.
    N(i64),
    /// Boolean value.
    Bool(bool),
}

impl AttrValue {
    /// Returns the string value, if this is a string attribute.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is a number attribute.
    pub fn as_n(&self) -> Option<i64> {
        match self {
            AttrValue::N(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::S(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::S(s.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::N(n)
    }
}

/// A physical item: a mapping from attribute name to scalar value.
pub type Item = HashMap<String, AttrValue>;

/// Composite primary key of an item in the base table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub pk: String,
    pub sk: String,
}

impl Key {
    /// Creates a key from partition and sort values.
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }

    /// Extracts the primary key from an item, if both attributes are present.
    pub fn of_item(item: &Item) -> Option<Key> {
        let pk = item.get(ATTR_PK)?.as_s()?;
        let sk = item.get(ATTR_SK)?.as_s()?;
        Some(Key::new(pk, sk))
    }
}
