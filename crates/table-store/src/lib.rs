//! Wide-column single-table storage boundary.
//!
//! One physical table holds every entity type, disambiguated by key
//! prefixes and a `Type` discriminator. This crate provides:
//! - The schema-less item model (`AttrValue`, `Item`, `Key`)
//! - The [`TableStore`] trait: point get/put/conditional-put/delete,
//!   partition queries against the base table or GSI1, filtered scans,
//!   and cursor pagination
//! - An in-memory backend for tests and a DynamoDB backend

pub mod cursor;
pub mod dynamo;
pub mod error;
pub mod item;
pub mod memory;
pub mod store;

pub use cursor::Cursor;
pub use dynamo::{DynamoTableStore, GSI1_NAME};
pub use error::{Result, StoreError};
pub use item::{ATTR_GSI1_PK, ATTR_GSI1_SK, ATTR_PK, ATTR_SK, AttrValue, Item, Key};
pub use memory::InMemoryTableStore;
pub use store::{FilterCond, Page, PutCondition, Query, Scan, TableIndex, TableStore};
