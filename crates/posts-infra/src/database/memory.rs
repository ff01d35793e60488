//! In-memory table implementation - used for tests and for running without AWS.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use posts_core::StoreError;
use posts_core::ports::{AttrValue, Item, KeySchema, Query, TableKey, TableStore, UpdateItem};

/// In-memory single table using a BTreeMap with async RwLock.
///
/// Secondary indexes are emulated by scanning records that carry the index
/// partition attribute. Every update runs under one write lock, which gives
/// the same per-record atomicity the real store provides.
/// Note: Data is lost on process restart.
pub struct InMemoryTable {
    schema: KeySchema,
    store: RwLock<BTreeMap<TableKey, Item>>,
}

impl InMemoryTable {
    pub fn new(schema: KeySchema) -> Self {
        Self {
            schema,
            store: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored records, deleted or not.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryTable {
    fn default() -> Self {
        Self::new(crate::database::schema::KEY_SCHEMA)
    }
}

#[async_trait]
impl TableStore for InMemoryTable {
    async fn put_item(&self, item: Item) -> Result<(), StoreError> {
        let key = self.schema.key_of(&item)?;
        let mut store = self.store.write().await;
        store.insert(key, item);
        Ok(())
    }

    async fn get_item(&self, key: &TableKey) -> Result<Option<Item>, StoreError> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn query(&self, query: Query) -> Result<Vec<Item>, StoreError> {
        let store = self.store.read().await;
        let partition = AttrValue::S(query.partition_value.clone());

        let mut matched: Vec<(Option<String>, &TableKey, &Item)> = store
            .iter()
            .filter(|(_, item)| item.get(query.index.partition_attr) == Some(&partition))
            .map(|(key, item)| {
                let sort = query
                    .index
                    .sort_attr
                    .and_then(|attr| item.get(attr))
                    .and_then(AttrValue::as_str)
                    .map(str::to_string);
                (sort, key, item)
            })
            // Items without the index sort attribute are not projected into the index.
            .filter(|(sort, _, _)| query.index.sort_attr.is_none() || sort.is_some())
            .collect();

        matched.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));
        if query.descending {
            matched.reverse();
        }

        Ok(matched
            .into_iter()
            .map(|(_, _, item)| item)
            .filter(|item| query.filters.iter().all(|c| c.matches(item)))
            .cloned()
            .collect())
    }

    async fn update_item(&self, update: UpdateItem) -> Result<(), StoreError> {
        if let Some((attr, _)) = update
            .assignments()
            .iter()
            .find(|(attr, _)| self.schema.is_key_attr(attr))
        {
            return Err(StoreError::Write(format!(
                "cannot update key attribute {attr}"
            )));
        }

        let mut store = self.store.write().await;
        let existing = store.get(update.key());

        // A missing record is evaluated as an empty item, so conditions
        // decide whether the update may create it.
        let empty = Item::new();
        let current = existing.unwrap_or(&empty);
        if !update.conditions().iter().all(|c| c.matches(current)) {
            return Err(StoreError::ConditionFailed);
        }

        let key = update.key().clone();
        let item = store.entry(key.clone()).or_insert_with(|| {
            let mut item = Item::new();
            item.insert(self.schema.partition_attr.to_string(), key.partition.into());
            item.insert(self.schema.sort_attr.to_string(), key.sort.into());
            item
        });
        for (attr, value) in update.assignments() {
            item.insert(attr.clone(), value.clone());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::{KEY_SCHEMA, LISTING_INDEX, SLUG_INDEX};
    use posts_core::ports::Condition;

    fn record(id: &str, date: Option<&str>, slug: &str) -> Item {
        let mut item = Item::new();
        item.insert("PK".into(), format!("POST#{id}").into());
        item.insert("SK".into(), "METADATA".into());
        item.insert("GSI1PK".into(), "POSTS".into());
        if let Some(date) = date {
            item.insert("GSI1SK".into(), date.into());
        }
        item.insert("slug".into(), slug.into());
        item
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let table = InMemoryTable::new(KEY_SCHEMA);
        table.put_item(record("1", Some("2024-01-01"), "a")).await.unwrap();

        let item = table
            .get_item(&TableKey::new("POST#1", "METADATA"))
            .await
            .unwrap();
        assert!(item.is_some());
        assert!(
            table
                .get_item(&TableKey::new("POST#2", "METADATA"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_put_without_key_is_malformed() {
        let table = InMemoryTable::new(KEY_SCHEMA);
        let mut item = record("1", None, "a");
        item.remove("SK");
        assert!(matches!(
            table.put_item(item).await,
            Err(StoreError::Malformed(_))
        ));
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_query_orders_by_index_sort_key() {
        let table = InMemoryTable::new(KEY_SCHEMA);
        table.put_item(record("1", Some("2024-02-01"), "b")).await.unwrap();
        table.put_item(record("2", Some("2024-03-01"), "c")).await.unwrap();
        table.put_item(record("3", Some("2024-01-01"), "a")).await.unwrap();
        table.put_item(record("4", None, "d")).await.unwrap();

        let items = table
            .query(Query::new(LISTING_INDEX, "POSTS").descending())
            .await
            .unwrap();
        let dates: Vec<_> = items
            .iter()
            .map(|i| i["GSI1SK"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    }

    #[tokio::test]
    async fn test_query_applies_filters_after_key_match() {
        let table = InMemoryTable::new(KEY_SCHEMA);
        let mut deleted = record("1", Some("2024-01-01"), "same");
        deleted.insert("isDeleted".into(), true.into());
        table.put_item(deleted).await.unwrap();
        table.put_item(record("2", Some("2024-01-02"), "same")).await.unwrap();

        let items = table
            .query(
                Query::new(SLUG_INDEX, "same").filter(Condition::not_equals("isDeleted", true)),
            )
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["PK"], AttrValue::from("POST#2"));
    }

    #[tokio::test]
    async fn test_update_respects_conditions() {
        let table = InMemoryTable::new(KEY_SCHEMA);
        let key = TableKey::new("POST#1", "METADATA");

        let update = UpdateItem::new(key.clone(), vec![("title".into(), "T".into())])
            .unwrap()
            .with_condition(Condition::attribute_exists("PK"));
        assert!(matches!(
            table.update_item(update.clone()).await,
            Err(StoreError::ConditionFailed)
        ));
        assert!(table.is_empty().await);

        table.put_item(record("1", Some("2024-01-01"), "a")).await.unwrap();
        table.update_item(update).await.unwrap();
        let item = table.get_item(&key).await.unwrap().unwrap();
        assert_eq!(item["title"], AttrValue::from("T"));
        assert_eq!(item["slug"], AttrValue::from("a"));
    }

    #[tokio::test]
    async fn test_update_rejects_key_attributes() {
        let table = InMemoryTable::new(KEY_SCHEMA);
        table.put_item(record("1", Some("2024-01-01"), "a")).await.unwrap();

        let update = UpdateItem::new(
            TableKey::new("POST#1", "METADATA"),
            vec![("PK".into(), "POST#2".into())],
        )
        .unwrap();
        assert!(matches!(
            table.update_item(update).await,
            Err(StoreError::Write(_))
        ));
    }
}
