//! In-memory record store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Record, RecordStore, ScanFilter, StoreResult, UpdateExpression, record_key};
use crate::core::config::DEFAULT_TABLE_NAME;

/// A record store kept entirely in process memory.
///
/// Records are ordered by key, which is the natural order a scan returns.
/// Contents are lost when the process exits.
pub struct MemoryStore {
    table_name: String,
    records: RwLock<BTreeMap<String, Record>>,
}

impl MemoryStore {
    /// Create an empty store for `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_NAME)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn scan(&self, filter: &ScanFilter) -> StoreResult<Vec<Record>> {
        let records = self.records.read().await;
        let matched: Vec<Record> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        debug!(table = %self.table_name, matched = matched.len(), "scan");
        Ok(matched)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Record>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, record: Record) -> StoreResult<()> {
        let key = record_key(&record)?;
        debug!(table = %self.table_name, %key, "put");
        self.records.write().await.insert(key, record);
        Ok(())
    }

    async fn update(&self, key: &str, update: &UpdateExpression) -> StoreResult<Record> {
        debug!(table = %self.table_name, %key, "update");
        let mut records = self.records.write().await;
        let record = records
            .entry(key.to_string())
            .and_modify(|r| update.apply(r))
            .or_insert_with(|| update.to_new_record(key));
        Ok(record.clone())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        debug!(table = %self.table_name, %key, "delete");
        self.records.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryStore::default();
        store
            .put(record(json!({ "id": "1", "content": "a" })))
            .await
            .unwrap();

        let fetched = store.get("1").await.unwrap().unwrap();
        assert_eq!(fetched["content"], "a");
        assert!(store.get("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_whole_record() {
        let store = MemoryStore::default();
        store
            .put(record(json!({ "id": "1", "content": "a", "category": "x" })))
            .await
            .unwrap();
        store
            .put(record(json!({ "id": "1", "content": "b" })))
            .await
            .unwrap();

        let fetched = store.get("1").await.unwrap().unwrap();
        assert_eq!(fetched["content"], "b");
        assert!(!fetched.contains_key("category"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_without_key_fails() {
        let store = MemoryStore::default();
        let result = store.put(record(json!({ "content": "a" }))).await;
        assert!(result.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_scan_with_filter() {
        let store = MemoryStore::default();
        for (id, user) in [("1", "u1"), ("2", "u2"), ("3", "u1")] {
            store
                .put(record(json!({ "id": id, "user_id": user })))
                .await
                .unwrap();
        }

        let matched = store
            .scan(&ScanFilter::all().eq("user_id", "u1"))
            .await
            .unwrap();
        let ids: Vec<_> = matched.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert_eq!(store.scan(&ScanFilter::all()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_existing() {
        let store = MemoryStore::default();
        store
            .put(record(json!({ "id": "1", "content": "a", "priority": 3 })))
            .await
            .unwrap();

        let updated = store
            .update("1", &UpdateExpression::new().set("priority", 5))
            .await
            .unwrap();
        assert_eq!(updated["priority"], 5);
        assert_eq!(updated["content"], "a");
        assert_eq!(store.get("1").await.unwrap().unwrap()["priority"], 5);
    }

    #[tokio::test]
    async fn test_update_missing_creates_record() {
        let store = MemoryStore::default();
        let created = store
            .update("9", &UpdateExpression::new().set("content", "z"))
            .await
            .unwrap();
        assert_eq!(created["id"], "9");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::default();
        store.put(record(json!({ "id": "1" }))).await.unwrap();

        store.delete("1").await.unwrap();
        store.delete("1").await.unwrap();
        store.delete("never-existed").await.unwrap();
        assert!(store.is_empty().await);
    }
}
