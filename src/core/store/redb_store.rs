//! Embedded on-disk record store backed by redb.
//!
//! Records are stored as JSON bytes in a single redb table named after the
//! configured table name. redb is synchronous, so each call runs on the
//! blocking thread pool.

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::{
    Record, RecordStore, ScanFilter, StoreError, StoreResult, UpdateExpression, record_key,
};

type RecordTable<'a> = TableDefinition<'a, &'static str, &'static [u8]>;

fn definition(name: &str) -> RecordTable<'_> {
    TableDefinition::new(name)
}

/// Record store persisted in a redb database file.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
    table_name: String,
}

impl RedbStore {
    /// Open (or create) the database at `path` and make sure the table exists.
    pub fn open(path: &Path, table_name: &str) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::backend)?;
            }
        }

        let db = Database::create(path).map_err(StoreError::backend)?;

        let write_txn = db.begin_write().map_err(StoreError::backend)?;
        {
            let _table = write_txn
                .open_table(definition(table_name))
                .map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;

        Ok(Self {
            db: Arc::new(db),
            table_name: table_name.to_string(),
        })
    }

    /// Run `op` against the database on the blocking pool.
    async fn blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database, RecordTable<'_>) -> StoreResult<T> + Send + 'static,
    {
        let db = self.db.clone();
        let table_name = self.table_name.clone();
        tokio::task::spawn_blocking(move || op(&db, definition(&table_name)))
            .await
            .map_err(StoreError::backend)?
    }
}

#[async_trait]
impl RecordStore for RedbStore {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn backend(&self) -> &'static str {
        "redb"
    }

    async fn scan(&self, filter: &ScanFilter) -> StoreResult<Vec<Record>> {
        let filter = filter.clone();
        let matched = self
            .blocking(move |db, table| {
                let read_txn = db.begin_read().map_err(StoreError::backend)?;
                let table = read_txn.open_table(table).map_err(StoreError::backend)?;

                let mut records = Vec::new();
                for item in table.iter().map_err(StoreError::backend)? {
                    let (_key, value) = item.map_err(StoreError::backend)?;
                    let record: Record = serde_json::from_slice(value.value())?;
                    if filter.matches(&record) {
                        records.push(record);
                    }
                }
                Ok(records)
            })
            .await?;

        debug!(table = %self.table_name, matched = matched.len(), "scan");
        Ok(matched)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Record>> {
        let key = key.to_string();
        self.blocking(move |db, table| {
            let read_txn = db.begin_read().map_err(StoreError::backend)?;
            let table = read_txn.open_table(table).map_err(StoreError::backend)?;

            let guard = table.get(key.as_str()).map_err(StoreError::backend)?;
            let record: Option<Record> = match guard {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            Ok(record)
        })
        .await
    }

    async fn put(&self, record: Record) -> StoreResult<()> {
        let key = record_key(&record)?;
        debug!(table = %self.table_name, %key, "put");
        let value = serde_json::to_vec(&record)?;

        self.blocking(move |db, table| {
            let write_txn = db.begin_write().map_err(StoreError::backend)?;
            {
                let mut table = write_txn.open_table(table).map_err(StoreError::backend)?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(StoreError::backend)?;
            }
            write_txn.commit().map_err(StoreError::backend)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, key: &str, update: &UpdateExpression) -> StoreResult<Record> {
        debug!(table = %self.table_name, %key, "update");
        let key = key.to_string();
        let update = update.clone();

        self.blocking(move |db, table| {
            let write_txn = db.begin_write().map_err(StoreError::backend)?;
            let record = {
                let mut table = write_txn.open_table(table).map_err(StoreError::backend)?;

                let existing: Option<Record> =
                    match table.get(key.as_str()).map_err(StoreError::backend)? {
                        Some(guard) => Some(serde_json::from_slice(guard.value())?),
                        None => None,
                    };

                let record = match existing {
                    Some(mut record) => {
                        update.apply(&mut record);
                        record
                    }
                    None => update.to_new_record(&key),
                };

                let value = serde_json::to_vec(&record)?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(StoreError::backend)?;
                record
            };
            write_txn.commit().map_err(StoreError::backend)?;
            Ok(record)
        })
        .await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        debug!(table = %self.table_name, %key, "delete");
        let key = key.to_string();

        self.blocking(move |db, table| {
            let write_txn = db.begin_write().map_err(StoreError::backend)?;
            {
                let mut table = write_txn.open_table(table).map_err(StoreError::backend)?;
                table.remove(key.as_str()).map_err(StoreError::backend)?;
            }
            write_txn.commit().map_err(StoreError::backend)?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    fn open_store(dir: &TempDir) -> RedbStore {
        RedbStore::open(&dir.path().join("store.redb"), "InstructionTable").unwrap()
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store
            .put(record(json!({ "id": "1", "content": "a" })))
            .await
            .unwrap();
        assert_eq!(store.get("1").await.unwrap().unwrap()["content"], "a");

        store.delete("1").await.unwrap();
        assert!(store.get("1").await.unwrap().is_none());

        // Deleting again is not an error
        store.delete("1").await.unwrap();
    }

    #[tokio::test]
    async fn test_scan_with_filter() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

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
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|r| r["user_id"] == "u1"));
    }

    #[tokio::test]
    async fn test_update_returns_full_record() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store
            .put(record(json!({ "id": "1", "content": "a", "priority": 3 })))
            .await
            .unwrap();

        let updated = store
            .update("1", &UpdateExpression::new().set("content", "b"))
            .await
            .unwrap();
        assert_eq!(updated["content"], "b");
        assert_eq!(updated["priority"], 3);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            store
                .put(record(json!({ "id": "1", "content": "kept" })))
                .await
                .unwrap();
        }

        let reopened = open_store(&dir);
        assert_eq!(reopened.get("1").await.unwrap().unwrap()["content"], "kept");
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("store.redb");
        let store = RedbStore::open(&path, "Custom").unwrap();
        assert_eq!(store.table_name(), "Custom");
        assert!(path.exists());
    }
}
