//! DynamoDB table store implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tracing::info;

use crate::cursor::Cursor;
use crate::error::StoreError;
use crate::item::{ATTR_PK, ATTR_SK, AttrValue, Item, Key};
use crate::store::{FilterCond, Page, PutCondition, Query, Scan, TableIndex, TableStore};
use crate::Result;

/// Name of the single global secondary index.
pub const GSI1_NAME: &str = "GSI1";

const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// DynamoDB implementation of [`TableStore`].
///
/// All entity types share one table; the repository layer encodes the
/// access patterns into `(PK, SK)` and the GSI1 projection. Every call
/// is bounded by a per-operation deadline; callers can additionally
/// cancel in-flight work by dropping the future.
#[derive(Clone)]
pub struct DynamoTableStore {
    client: Client,
    table_name: String,
    op_timeout: Duration,
}

impl DynamoTableStore {
    /// Creates a store over an existing client.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Connects using the ambient AWS configuration, optionally pointed
    /// at a local endpoint (DynamoDB Local).
    pub async fn connect(table_name: impl Into<String>, endpoint_url: Option<&str>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let client = if let Some(endpoint) = endpoint_url {
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamo_config)
        } else {
            Client::new(&config)
        };

        let table_name = table_name.into();
        info!(table = %table_name, "connected to DynamoDB");

        Self {
            client,
            table_name,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Overrides the per-operation deadline.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| StoreError::DeadlineExceeded { op })?
    }
}

fn to_dynamo_value(value: AttrValue) -> AttributeValue {
    match value {
        AttrValue::S(s) => AttributeValue::S(s),
        AttrValue::N(n) => AttributeValue::N(n.to_string()),
        AttrValue::Bool(b) => AttributeValue::Bool(b),
    }
}

fn to_dynamo_item(item: Item) -> HashMap<String, AttributeValue> {
    item.into_iter()
        .map(|(name, value)| (name, to_dynamo_value(value)))
        .collect()
}

fn from_dynamo_item(map: &HashMap<String, AttributeValue>) -> Result<Item> {
    let mut item = Item::with_capacity(map.len());
    for (name, value) in map {
        let converted = match value {
            AttributeValue::S(s) => AttrValue::S(s.clone()),
            AttributeValue::N(n) => {
                AttrValue::N(n.parse().map_err(|_| StoreError::UnsupportedAttribute {
                    attribute: name.clone(),
                })?)
            }
            AttributeValue::Bool(b) => AttrValue::Bool(*b),
            _ => {
                return Err(StoreError::UnsupportedAttribute {
                    attribute: name.clone(),
                });
            }
        };
        item.insert(name.clone(), converted);
    }
    Ok(item)
}

fn start_key_from(cursor: &Option<Cursor>) -> Result<Option<HashMap<String, AttributeValue>>> {
    match cursor {
        Some(cursor) => {
            let attrs = cursor.decode()?;
            Ok(Some(
                attrs
                    .into_iter()
                    .map(|(name, value)| (name, to_dynamo_value(value)))
                    .collect(),
            ))
        }
        None => Ok(None),
    }
}

/// Builds a DynamoDB filter expression with its placeholder bindings.
fn filter_expression(
    conditions: &[FilterCond],
) -> (String, Vec<(String, &'static str)>, Vec<(String, AttributeValue)>) {
    let mut clauses = Vec::with_capacity(conditions.len());
    let mut names = Vec::with_capacity(conditions.len());
    let mut values = Vec::with_capacity(conditions.len());
    for (i, cond) in conditions.iter().enumerate() {
        let (attr, op, value) = match cond {
            FilterCond::Equals(attr, value) => (*attr, "=", value.clone()),
            FilterCond::GreaterThan(attr, floor) => (*attr, ">", AttrValue::N(*floor)),
        };
        clauses.push(format!("#f{i} {op} :v{i}"));
        names.push((format!("#f{i}"), attr));
        values.push((format!(":v{i}"), to_dynamo_value(value)));
    }
    (clauses.join(" AND "), names, values)
}

fn page_cursor(last_key: Option<&HashMap<String, AttributeValue>>) -> Result<Option<Cursor>> {
    match last_key {
        Some(map) => {
            let attrs = from_dynamo_item(map)?;
            Ok(Some(Cursor::encode(&attrs)?))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl TableStore for DynamoTableStore {
    async fn get(&self, key: &Key) -> Result<Option<Item>> {
        let request = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_PK, AttributeValue::S(key.pk.clone()))
            .key(ATTR_SK, AttributeValue::S(key.sk.clone()));

        let output = self
            .bounded("get", async {
                request.send().await.map_err(StoreError::backend)
            })
            .await?;

        match output.item() {
            Some(map) => Ok(Some(from_dynamo_item(map)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, item: Item) -> Result<()> {
        let request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_dynamo_item(item)));

        self.bounded("put", async {
            request.send().await.map_err(StoreError::backend)?;
            Ok(())
        })
        .await
    }

    async fn put_if(&self, item: Item, condition: PutCondition) -> Result<()> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_dynamo_item(item)));

        request = match condition {
            PutCondition::AttributeNotExists(attr) => request
                .condition_expression("attribute_not_exists(#cond)")
                .expression_attribute_names("#cond", attr),
            PutCondition::NumberEquals(attr, expected) => request
                .condition_expression("#cond = :expected")
                .expression_attribute_names("#cond", attr)
                .expression_attribute_values(":expected", AttributeValue::N(expected.to_string())),
        };

        self.bounded("put_if", async {
            request.send().await.map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    StoreError::ConditionFailed
                } else {
                    StoreError::backend(service_err)
                }
            })?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &Key) -> Result<bool> {
        let request = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_PK, AttributeValue::S(key.pk.clone()))
            .key(ATTR_SK, AttributeValue::S(key.sk.clone()))
            .return_values(ReturnValue::AllOld);

        let output = self
            .bounded("delete", async {
                request.send().await.map_err(StoreError::backend)
            })
            .await?;

        Ok(output.attributes().is_some())
    }

    async fn query(&self, query: Query) -> Result<Page> {
        let (pk_attr, sk_attr) = query.index.key_attrs();

        let mut request = self
            .client
            .query()
            .table_name(&self.table_name)
            .expression_attribute_names("#pk", pk_attr)
            .expression_attribute_values(":pk", AttributeValue::S(query.partition.clone()));

        request = if let Some(prefix) = &query.sort_prefix {
            request
                .key_condition_expression("#pk = :pk AND begins_with(#sk, :prefix)")
                .expression_attribute_names("#sk", sk_attr)
                .expression_attribute_values(":prefix", AttributeValue::S(prefix.clone()))
        } else {
            request.key_condition_expression("#pk = :pk")
        };

        if query.index == TableIndex::Gsi1 {
            request = request.index_name(GSI1_NAME);
        }
        if !query.filters.is_empty() {
            let (expression, names, values) = filter_expression(&query.filters);
            request = request.filter_expression(expression);
            for (placeholder, attr) in names {
                request = request.expression_attribute_names(placeholder, attr);
            }
            for (placeholder, value) in values {
                request = request.expression_attribute_values(placeholder, value);
            }
        }
        if let Some(limit) = query.limit {
            request = request.limit(limit as i32);
        }
        request = request.set_exclusive_start_key(start_key_from(&query.cursor)?);

        let output = self
            .bounded("query", async {
                request.send().await.map_err(StoreError::backend)
            })
            .await?;

        let items = output
            .items()
            .iter()
            .map(from_dynamo_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            cursor: page_cursor(output.last_evaluated_key())?,
        })
    }

    async fn scan(&self, scan: Scan) -> Result<Page> {
        let mut request = self.client.scan().table_name(&self.table_name);

        if !scan.conditions.is_empty() {
            let (expression, names, values) = filter_expression(&scan.conditions);
            request = request.filter_expression(expression);
            for (placeholder, attr) in names {
                request = request.expression_attribute_names(placeholder, attr);
            }
            for (placeholder, value) in values {
                request = request.expression_attribute_values(placeholder, value);
            }
        }

        if let Some(limit) = scan.limit {
            request = request.limit(limit as i32);
        }
        request = request.set_exclusive_start_key(start_key_from(&scan.cursor)?);

        let output = self
            .bounded("scan", async {
                request.send().await.map_err(StoreError::backend)
            })
            .await?;

        let items = output
            .items()
            .iter()
            .map(from_dynamo_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            cursor: page_cursor(output.last_evaluated_key())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_value_conversion_round_trip() {
        let mut item = Item::new();
        item.insert("S".to_string(), AttrValue::S("text".into()));
        item.insert("N".to_string(), AttrValue::N(-42));
        item.insert("B".to_string(), AttrValue::Bool(true));

        let dynamo = to_dynamo_item(item.clone());
        assert_eq!(dynamo.get("N"), Some(&AttributeValue::N("-42".to_string())));
        assert_eq!(from_dynamo_item(&dynamo).unwrap(), item);
    }

    #[test]
    fn test_filter_expression_binds_placeholders() {
        let (expression, names, values) = filter_expression(&[
            FilterCond::Equals("Status", "pending".into()),
            FilterCond::GreaterThan("Stock", 0),
        ]);
        assert_eq!(expression, "#f0 = :v0 AND #f1 > :v1");
        assert_eq!(names, [("#f0".to_string(), "Status"), ("#f1".to_string(), "Stock")]);
        assert_eq!(values[1].1, AttributeValue::N("0".to_string()));
    }

    #[test]
    fn test_non_integer_number_is_rejected() {
        let mut map = HashMap::new();
        map.insert("Price".to_string(), AttributeValue::N("1.5".to_string()));
        assert!(matches!(
            from_dynamo_item(&map),
            Err(StoreError::UnsupportedAttribute { .. })
        ));
    }
}
