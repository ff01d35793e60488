//! DynamoDB table implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::AttributeValue;

use posts_core::StoreError;
use posts_core::ports::{
    AttrValue, Condition, Item, KeySchema, Query, TableKey, TableStore, UpdateItem,
};

use super::schema::{DEFAULT_TABLE_NAME, KEY_SCHEMA};

type DynamoItem = HashMap<String, AttributeValue>;

/// DynamoDB connection configuration.
#[derive(Debug, Clone)]
pub struct DynamoConfig {
    /// Table holding every post record.
    pub table_name: String,
    /// Endpoint override (e.g., http://localhost:8000 for DynamoDB Local)
    pub endpoint_url: Option<String>,
    /// Region override; the default provider chain is used when unset.
    pub region: Option<String>,
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            endpoint_url: None,
            region: None,
        }
    }
}

impl DynamoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            table_name: std::env::var("TABLE_NAME")
                .unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string()),
            endpoint_url: std::env::var("DYNAMODB_ENDPOINT_URL").ok(),
            region: std::env::var("AWS_REGION").ok(),
        }
    }
}

/// DynamoDB-backed table.
///
/// The SDK client is cheap to clone and safe to share across tasks.
/// Expressions only ever contain generated placeholders (`#u0`, `:u0`);
/// attribute names and values travel in the substitution maps.
#[derive(Clone)]
pub struct DynamoTable {
    client: Client,
    table_name: String,
    schema: KeySchema,
}

impl DynamoTable {
    pub fn new(client: Client, table_name: impl Into<String>, schema: KeySchema) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            schema,
        }
    }

    /// Build a client from the AWS default provider chain.
    pub async fn connect(config: &DynamoConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(url) = &config.endpoint_url {
            builder = builder.endpoint_url(url);
        }

        tracing::info!(
            table = %config.table_name,
            endpoint = ?config.endpoint_url,
            "DynamoDB table client ready"
        );

        Self::new(
            Client::from_conf(builder.build()),
            config.table_name.clone(),
            KEY_SCHEMA,
        )
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn key_map(&self, key: &TableKey) -> DynamoItem {
        HashMap::from([
            (
                self.schema.partition_attr.to_string(),
                AttributeValue::S(key.partition.clone()),
            ),
            (
                self.schema.sort_attr.to_string(),
                AttributeValue::S(key.sort.clone()),
            ),
        ])
    }
}

#[async_trait]
impl TableStore for DynamoTable {
    async fn put_item(&self, item: Item) -> Result<(), StoreError> {
        self.schema.key_of(&item)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_dynamo_item(item)))
            .send()
            .await
            .map_err(|e| store_error(e, StoreError::Write))?;

        Ok(())
    }

    async fn get_item(&self, key: &TableKey) -> Result<Option<Item>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key_map(key)))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| store_error(e, StoreError::Read))?;

        Ok(output.item().cloned().map(from_dynamo_item))
    }

    async fn query(&self, query: Query) -> Result<Vec<Item>, StoreError> {
        let mut expr = ExpressionBuilder::default();
        let key_condition = format!(
            "{} = {}",
            expr.name("k", query.index.partition_attr),
            expr.value("k", AttrValue::S(query.partition_value.clone())),
        );
        let filter = expr.conditions("f", &query.filters);

        let mut items = Vec::new();
        let mut start_key: Option<DynamoItem> = None;
        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(query.index.name)
                .key_condition_expression(&key_condition)
                .set_filter_expression(filter.clone())
                .set_expression_attribute_names(Some(expr.names.clone()))
                .set_expression_attribute_values(Some(expr.values.clone()))
                .scan_index_forward(!query.descending)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| store_error(e, StoreError::Read))?;

            items.extend(output.items().iter().cloned().map(from_dynamo_item));

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        tracing::debug!(index = query.index.name, count = items.len(), "DynamoDB query");
        Ok(items)
    }

    async fn update_item(&self, update: UpdateItem) -> Result<(), StoreError> {
        let mut expr = ExpressionBuilder::default();
        let sets: Vec<String> = update
            .assignments()
            .iter()
            .map(|(attr, value)| {
                format!("{} = {}", expr.name("u", attr), expr.value("u", value.clone()))
            })
            .collect();
        let update_expression = format!("SET {}", sets.join(", "));
        let condition = expr.conditions("c", update.conditions());

        self.client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key_map(update.key())))
            .update_expression(update_expression)
            .set_condition_expression(condition)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .send()
            .await
            .map_err(|e| {
                let condition_failed = e
                    .as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception());
                if condition_failed {
                    StoreError::ConditionFailed
                } else {
                    store_error(e, StoreError::Write)
                }
            })?;

        Ok(())
    }
}

/// Collects placeholder substitutions for one request.
#[derive(Default)]
struct ExpressionBuilder {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl ExpressionBuilder {
    fn name(&mut self, prefix: &str, attr: &str) -> String {
        let placeholder = format!("#{prefix}{}", self.names.len());
        self.names.insert(placeholder.clone(), attr.to_string());
        placeholder
    }

    fn value(&mut self, prefix: &str, value: AttrValue) -> String {
        let placeholder = format!(":{prefix}{}", self.values.len());
        self.values.insert(placeholder.clone(), to_dynamo_value(value));
        placeholder
    }

    /// AND of all conditions, or `None` when there are none.
    fn conditions(&mut self, prefix: &str, conditions: &[Condition]) -> Option<String> {
        let rendered: Vec<String> = conditions
            .iter()
            .map(|condition| match condition {
                Condition::AttributeExists(attr) => {
                    format!("attribute_exists({})", self.name(prefix, attr))
                }
                Condition::NotEquals(attr, value) => {
                    let name = self.name(prefix, attr);
                    format!("{name} <> {}", self.value(prefix, value.clone()))
                }
            })
            .collect();

        (!rendered.is_empty()).then(|| rendered.join(" AND "))
    }
}

fn store_error<E, R>(err: SdkError<E, R>, fallback: fn(String) -> StoreError) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StoreError::Connection(message)
        }
        _ => fallback(message),
    }
}

fn to_dynamo_item(item: Item) -> DynamoItem {
    item.into_iter()
        .map(|(attr, value)| (attr, to_dynamo_value(value)))
        .collect()
}

fn to_dynamo_value(value: AttrValue) -> AttributeValue {
    match value {
        AttrValue::S(s) => AttributeValue::S(s),
        AttrValue::Bool(b) => AttributeValue::Bool(b),
        AttrValue::L(values) => {
            AttributeValue::L(values.into_iter().map(to_dynamo_value).collect())
        }
        AttrValue::Null => AttributeValue::Null(true),
    }
}

fn from_dynamo_item(item: DynamoItem) -> Item {
    item.into_iter()
        .filter_map(|(attr, value)| match from_dynamo_value(value) {
            Some(value) => Some((attr, value)),
            None => {
                tracing::debug!(attribute = %attr, "Ignoring attribute of unsupported type");
                None
            }
        })
        .collect()
}

fn from_dynamo_value(value: AttributeValue) -> Option<AttrValue> {
    match value {
        AttributeValue::S(s) => Some(AttrValue::S(s)),
        AttributeValue::Bool(b) => Some(AttrValue::Bool(b)),
        AttributeValue::L(values) => Some(AttrValue::L(
            values.into_iter().filter_map(from_dynamo_value).collect(),
        )),
        // String sets written by other tools are read as plain lists.
        AttributeValue::Ss(values) => Some(AttrValue::L(
            values.into_iter().map(AttrValue::S).collect(),
        )),
        AttributeValue::Null(_) => Some(AttrValue::Null),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_use_placeholders_only() {
        let mut expr = ExpressionBuilder::default();
        let rendered = expr
            .conditions(
                "c",
                &[
                    Condition::attribute_exists("PK"),
                    Condition::not_equals("isDeleted", true),
                ],
            )
            .unwrap();

        assert_eq!(rendered, "attribute_exists(#c0) AND #c1 <> :c0");
        assert_eq!(expr.names["#c0"], "PK");
        assert_eq!(expr.names["#c1"], "isDeleted");
        assert_eq!(expr.values[":c0"], AttributeValue::Bool(true));
    }

    #[test]
    fn test_no_conditions_renders_nothing() {
        let mut expr = ExpressionBuilder::default();
        assert_eq!(expr.conditions("f", &[]), None);
        assert!(expr.names.is_empty());
    }

    #[test]
    fn test_item_conversion_keeps_supported_types() {
        let mut item = Item::new();
        item.insert("title".into(), "Hello".into());
        item.insert("tags".into(), vec!["a".to_string(), "b".to_string()].into());
        item.insert("isDeleted".into(), false.into());
        item.insert("deletedAt".into(), AttrValue::Null);

        let back = from_dynamo_item(to_dynamo_item(item.clone()));
        assert_eq!(back, item);
    }

    #[test]
    fn test_string_sets_and_numbers() {
        let mut raw = DynamoItem::new();
        raw.insert(
            "tags".into(),
            AttributeValue::Ss(vec!["x".to_string(), "y".to_string()]),
        );
        raw.insert("views".into(), AttributeValue::N("3".to_string()));

        let item = from_dynamo_item(raw);
        assert_eq!(item["tags"], vec!["x".to_string(), "y".to_string()].into());
        assert!(!item.contains_key("views"));
    }

    async fn get_test_table() -> Option<DynamoTable> {
        // Only runs against DynamoDB Local or a real table when configured.
        let config = DynamoConfig::from_env();
        config.endpoint_url.as_ref()?;
        Some(DynamoTable::connect(&config).await)
    }

    #[tokio::test]
    async fn test_dynamo_get_missing_item() {
        let table = match get_test_table().await {
            Some(t) => t,
            None => return,
        };

        let item = table
            .get_item(&TableKey::new("POST#does-not-exist", "METADATA"))
            .await
            .unwrap();
        assert!(item.is_none());
    }
}
