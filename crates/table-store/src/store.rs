//! The storage boundary: point operations, partition queries, and
//! filtered scans over one physical table.

use async_trait::async_trait;

use crate::cursor::Cursor;
use crate::item::{ATTR_GSI1_PK, ATTR_GSI1_SK, ATTR_PK, ATTR_SK, AttrValue, Item, Key};
use crate::Result;

/// Which key projection a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableIndex {
    /// The base table, keyed by `(PK, SK)`.
    Primary,
    /// The first global secondary index, keyed by `(GSI1PK, GSI1SK)`.
    Gsi1,
}

impl TableIndex {
    /// Attribute names of this projection's partition and sort keys.
    pub fn key_attrs(&self) -> (&'static str, &'static str) {
        match self {
            TableIndex::Primary => (ATTR_PK, ATTR_SK),
            TableIndex::Gsi1 => (ATTR_GSI1_PK, ATTR_GSI1_SK),
        }
    }
}

/// A partition query: exact partition value, optional sort-key prefix,
/// optional non-key attribute filters, optional page limit and
/// continuation cursor.
#[derive(Debug, Clone)]
pub struct Query {
    pub index: TableIndex,
    pub partition: String,
    pub sort_prefix: Option<String>,
    pub filters: Vec<FilterCond>,
    pub limit: Option<u32>,
    pub cursor: Option<Cursor>,
}

impl Query {
    /// Query a partition of the given index.
    pub fn partition(index: TableIndex, partition: impl Into<String>) -> Self {
        Self {
            index,
            partition: partition.into(),
            sort_prefix: None,
            filters: Vec::new(),
            limit: None,
            cursor: None,
        }
    }

    /// Restricts results to sort keys starting with `prefix`.
    pub fn sort_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sort_prefix = Some(prefix.into());
        self
    }

    /// Adds a non-key attribute predicate applied after key matching.
    pub fn filter(mut self, condition: FilterCond) -> Self {
        self.filters.push(condition);
        self
    }

    /// Caps the number of items returned in one page.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resumes from a previously returned cursor.
    pub fn cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// A single attribute predicate for scans and filtered queries.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCond {
    /// Attribute equals the given value.
    Equals(&'static str, AttrValue),
    /// Number attribute is strictly greater than the given value.
    GreaterThan(&'static str, i64),
}

/// A filtered scan over the whole table. All conditions must hold.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub conditions: Vec<FilterCond>,
    pub limit: Option<u32>,
    pub cursor: Option<Cursor>,
}

impl Scan {
    /// Scan with the given filter conditions.
    pub fn filtered(conditions: Vec<FilterCond>) -> Self {
        Self {
            conditions,
            limit: None,
            cursor: None,
        }
    }

    /// Caps the number of items examined in one page.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resumes from a previously returned cursor.
    pub fn cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// One page of query or scan results.
///
/// `cursor` is `Some` when more items may follow; passing it back resumes
/// where this page ended. `None` signals end-of-results.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Item>,
    pub cursor: Option<Cursor>,
}

/// Condition attached to a conditional put.
#[derive(Debug, Clone, PartialEq)]
pub enum PutCondition {
    /// The item must not already carry the named attribute (i.e. the item
    /// must not exist, for key attributes).
    AttributeNotExists(&'static str),
    /// The stored item's number attribute must equal the given value
    /// (compare-and-swap on a previously observed value).
    NumberEquals(&'static str, i64),
}

/// Core trait for single-table store backends.
///
/// Implementations must be thread-safe (`Send + Sync`); the handle is
/// shared across request tasks via cheap clones. No cross-item
/// transactions are assumed: every operation touches one item, except
/// query/scan which read one key range.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Point-reads an item by primary key. `Ok(None)` when absent.
    async fn get(&self, key: &Key) -> Result<Option<Item>>;

    /// Writes an item, replacing any existing item with the same key.
    async fn put(&self, item: Item) -> Result<()>;

    /// Writes an item only if `condition` holds against the currently
    /// stored item; fails with [`StoreError::ConditionFailed`] otherwise.
    ///
    /// [`StoreError::ConditionFailed`]: crate::StoreError::ConditionFailed
    async fn put_if(&self, item: Item, condition: PutCondition) -> Result<()>;

    /// Deletes an item by primary key. Returns false when nothing was
    /// stored under the key.
    async fn delete(&self, key: &Key) -> Result<bool>;

    /// Queries one partition of the base table or GSI1, sorted ascending
    /// by the projection's sort key.
    async fn query(&self, query: Query) -> Result<Page>;

    /// Scans the table with attribute filters.
    async fn scan(&self, scan: Scan) -> Result<Page>;
}

/// Evaluates filter conditions against an item.
pub(crate) fn matches_filters(item: &Item, conditions: &[FilterCond]) -> bool {
    conditions.iter().all(|cond| match cond {
        FilterCond::Equals(attr, expected) => item.get(*attr) == Some(expected),
        FilterCond::GreaterThan(attr, floor) => {
            matches!(item.get(*attr), Some(AttrValue::N(n)) if n > floor)
        }
    })
}
