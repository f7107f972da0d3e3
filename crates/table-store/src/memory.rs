//! In-memory table store for tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cursor::Cursor;
use crate::error::StoreError;
use crate::item::{ATTR_PK, ATTR_SK, AttrValue, Item, Key};
use crate::store::{Page, PutCondition, Query, Scan, TableIndex, TableStore, matches_filters};
use crate::Result;

/// In-memory table store implementation.
///
/// Provides the same observable behavior as the DynamoDB backend: items
/// keyed by `(PK, SK)`, partition queries sorted ascending by the chosen
/// projection's sort key, conditional writes evaluated atomically under
/// a write lock, and cursor pagination. The page limit here caps matched
/// items, which is sufficient for the repository layer.
#[derive(Clone, Default)]
pub struct InMemoryTableStore {
    items: Arc<RwLock<BTreeMap<Key, Item>>>,
}

impl InMemoryTableStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of items stored.
    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }

    /// Clears all items.
    pub async fn clear(&self) {
        self.items.write().await.clear();
    }

    fn last_key_of(item: &Item, index: TableIndex) -> HashMap<String, AttrValue> {
        let mut last = HashMap::new();
        for attr in [ATTR_PK, ATTR_SK] {
            if let Some(v) = item.get(attr) {
                last.insert(attr.to_string(), v.clone());
            }
        }
        if index == TableIndex::Gsi1 {
            let (pk_attr, sk_attr) = index.key_attrs();
            for attr in [pk_attr, sk_attr] {
                if let Some(v) = item.get(attr) {
                    last.insert(attr.to_string(), v.clone());
                }
            }
        }
        last
    }

    fn page_from(
        mut matched: Vec<(String, Key, Item)>,
        limit: Option<u32>,
        index: TableIndex,
    ) -> Result<Page> {
        matched.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

        let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let more = matched.len() > limit;
        matched.truncate(limit);

        let cursor = if more {
            match matched.last() {
                Some((_, _, item)) => Some(Cursor::encode(&Self::last_key_of(item, index))?),
                None => None,
            }
        } else {
            None
        };

        Ok(Page {
            items: matched.into_iter().map(|(_, _, item)| item).collect(),
            cursor,
        })
    }
}

/// Position marker decoded from a cursor: the sort value and base key of
/// the last item already returned.
fn resume_point(
    cursor: &Option<Cursor>,
    sort_attr: &str,
) -> Result<Option<(String, Key)>> {
    let Some(cursor) = cursor else {
        return Ok(None);
    };
    let attrs = cursor.decode()?;
    let sort = attrs
        .get(sort_attr)
        .and_then(AttrValue::as_s)
        .ok_or_else(|| StoreError::InvalidCursor(format!("missing {sort_attr}")))?
        .to_string();
    let pk = attrs.get(ATTR_PK).and_then(AttrValue::as_s).unwrap_or("");
    let sk = attrs.get(ATTR_SK).and_then(AttrValue::as_s).unwrap_or("");
    Ok(Some((sort, Key::new(pk, sk))))
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn get(&self, key: &Key) -> Result<Option<Item>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn put(&self, item: Item) -> Result<()> {
        let key = Key::of_item(&item).ok_or_else(|| StoreError::UnsupportedAttribute {
            attribute: "PK/SK".to_string(),
        })?;
        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn put_if(&self, item: Item, condition: PutCondition) -> Result<()> {
        let key = Key::of_item(&item).ok_or_else(|| StoreError::UnsupportedAttribute {
            attribute: "PK/SK".to_string(),
        })?;

        let mut items = self.items.write().await;
        let existing = items.get(&key);
        let holds = match &condition {
            PutCondition::AttributeNotExists(attr) => {
                existing.is_none_or(|item| !item.contains_key(*attr))
            }
            PutCondition::NumberEquals(attr, expected) => existing
                .is_some_and(|item| item.get(*attr).and_then(AttrValue::as_n) == Some(*expected)),
        };
        if !holds {
            return Err(StoreError::ConditionFailed);
        }
        items.insert(key, item);
        Ok(())
    }

    async fn delete(&self, key: &Key) -> Result<bool> {
        Ok(self.items.write().await.remove(key).is_some())
    }

    async fn query(&self, query: Query) -> Result<Page> {
        let (pk_attr, sk_attr) = query.index.key_attrs();
        let after = resume_point(&query.cursor, sk_attr)?;

        let items = self.items.read().await;
        let matched: Vec<(String, Key, Item)> = items
            .iter()
            .filter_map(|(key, item)| {
                let pk = item.get(pk_attr).and_then(AttrValue::as_s)?;
                if pk != query.partition {
                    return None;
                }
                let sort = item.get(sk_attr).and_then(AttrValue::as_s)?.to_string();
                if let Some(prefix) = &query.sort_prefix
                    && !sort.starts_with(prefix.as_str())
                {
                    return None;
                }
                if let Some((after_sort, after_key)) = &after
                    && (&sort, key) <= (after_sort, after_key)
                {
                    return None;
                }
                if !matches_filters(item, &query.filters) {
                    return None;
                }
                Some((sort, key.clone(), item.clone()))
            })
            .collect();
        drop(items);

        Self::page_from(matched, query.limit, query.index)
    }

    async fn scan(&self, scan: Scan) -> Result<Page> {
        let after = resume_point(&scan.cursor, ATTR_SK)?;

        let items = self.items.read().await;
        let matched: Vec<(String, Key, Item)> = items
            .iter()
            .filter_map(|(key, item)| {
                if let Some((_, after_key)) = &after
                    && key <= after_key
                {
                    return None;
                }
                if !matches_filters(item, &scan.conditions) {
                    return None;
                }
                Some((key.sk.clone(), key.clone(), item.clone()))
            })
            .collect();
        drop(items);

        // Scan pages are ordered by base key, not by a projection sort key.
        let mut matched = matched;
        matched.sort_by(|a, b| a.1.cmp(&b.1));
        let limit = scan.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let more = matched.len() > limit;
        matched.truncate(limit);
        let cursor = if more {
            match matched.last() {
                Some((_, _, item)) => Some(Cursor::encode(&Self::last_key_of(
                    item,
                    TableIndex::Primary,
                ))?),
                None => None,
            }
        } else {
            None
        };

        Ok(Page {
            items: matched.into_iter().map(|(_, _, item)| item).collect(),
            cursor,
        })
    }
}
