//! Table store port - a single-table key-value store with secondary indexes.
//!
//! The shape follows wide-column stores such as DynamoDB: records are
//! attribute maps addressed by a partition/sort key pair, and secondary
//! indexes are queried by partition value with an optional sort order.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::StoreError;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    S(String),
    Bool(bool),
    L(Vec<AttrValue>),
    Null,
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::L(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::S(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::S(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(values: Vec<String>) -> Self {
        AttrValue::L(values.into_iter().map(AttrValue::S).collect())
    }
}

impl From<Option<String>> for AttrValue {
    fn from(value: Option<String>) -> Self {
        value.map(AttrValue::S).unwrap_or(AttrValue::Null)
    }
}

/// A stored record.
pub type Item = BTreeMap<String, AttrValue>;

/// Attribute names making up the table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySchema {
    pub partition_attr: &'static str,
    pub sort_attr: &'static str,
}

impl KeySchema {
    /// Extract the primary key of an item.
    pub fn key_of(&self, item: &Item) -> Result<TableKey, StoreError> {
        let read = |attr: &str| {
            item.get(attr)
                .and_then(AttrValue::as_str)
                .map(str::to_string)
                .ok_or_else(|| StoreError::Malformed(format!("missing key attribute {attr}")))
        };

        Ok(TableKey {
            partition: read(self.partition_attr)?,
            sort: read(self.sort_attr)?,
        })
    }

    pub fn is_key_attr(&self, attr: &str) -> bool {
        attr == self.partition_attr || attr == self.sort_attr
    }
}

/// Primary key of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableKey {
    pub partition: String,
    pub sort: String,
}

impl TableKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

/// A secondary index definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub partition_attr: &'static str,
    pub sort_attr: Option<&'static str>,
}

/// A condition on a record's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The attribute is present.
    AttributeExists(String),
    /// The attribute is absent or holds a different value.
    NotEquals(String, AttrValue),
}

impl Condition {
    pub fn attribute_exists(attr: impl Into<String>) -> Self {
        Condition::AttributeExists(attr.into())
    }

    pub fn not_equals(attr: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Condition::NotEquals(attr.into(), value.into())
    }

    /// Evaluate the condition against a record.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Condition::AttributeExists(attr) => item.contains_key(attr),
            Condition::NotEquals(attr, value) => item.get(attr) != Some(value),
        }
    }
}

/// Query against a secondary index.
///
/// Filters are applied after key matching: they narrow what is returned,
/// not what the store reads.
#[derive(Debug, Clone)]
pub struct Query {
    pub index: IndexSpec,
    pub partition_value: String,
    pub descending: bool,
    pub filters: Vec<Condition>,
}

impl Query {
    pub fn new(index: IndexSpec, partition_value: impl Into<String>) -> Self {
        Self {
            index,
            partition_value: partition_value.into(),
            descending: false,
            filters: Vec::new(),
        }
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filters.push(condition);
        self
    }
}

/// One atomic update of a single record.
///
/// Always carries at least one assignment, so an empty `SET` can never
/// reach the store.
#[derive(Debug, Clone)]
pub struct UpdateItem {
    key: TableKey,
    assignments: Vec<(String, AttrValue)>,
    conditions: Vec<Condition>,
}

impl UpdateItem {
    pub fn new(key: TableKey, assignments: Vec<(String, AttrValue)>) -> Result<Self, StoreError> {
        if assignments.is_empty() {
            return Err(StoreError::Malformed(
                "update carries no assignments".to_string(),
            ));
        }

        Ok(Self {
            key,
            assignments,
            conditions: Vec::new(),
        })
    }

    /// Require a condition to hold for the update to apply.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn key(&self) -> &TableKey {
        &self.key
    }

    pub fn assignments(&self) -> &[(String, AttrValue)] {
        &self.assignments
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// Table store trait - abstraction over single-table backends (DynamoDB, in-memory).
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Write a full record, replacing any record with the same key.
    async fn put_item(&self, item: Item) -> Result<(), StoreError>;

    /// Read a record by primary key.
    async fn get_item(&self, key: &TableKey) -> Result<Option<Item>, StoreError>;

    /// Query a secondary index. Returns every matching record.
    async fn query(&self, query: Query) -> Result<Vec<Item>, StoreError>;

    /// Apply an update atomically.
    ///
    /// Fails with [`StoreError::ConditionFailed`] when any condition does
    /// not hold; nothing is written in that case.
    async fn update_item(&self, update: UpdateItem) -> Result<(), StoreError>;
}
