//! Record store adapter.
//!
//! A generic key-value/document store API used by the instruction repository.
//! Every table is keyed by the string `id` attribute of its records, and each
//! record is a plain JSON object.
//!
//! ## Backends
//!
//! - [`MemoryStore`] - in-process table, the default
//! - [`RedbStore`] - embedded on-disk table backed by `redb`
//!
//! Use [`open`] to build the backend selected by [`StoreConfig`].

mod error;
mod expression;
mod memory;
mod redb_store;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::core::config::{StoreBackend, StoreConfig};

pub use error::{StoreError, StoreResult};
pub use expression::{Condition, ScanFilter, UpdateExpression};
pub use memory::MemoryStore;
pub use redb_store::RedbStore;

/// Name of the key attribute every stored record carries.
pub const PRIMARY_KEY: &str = "id";

/// A stored record: a JSON object with at least the [`PRIMARY_KEY`] attribute.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Generic CRUD operations against a single table.
///
/// Implementations own their connection lifecycle and synchronization.
/// Callers get no cross-record atomicity: each call touches one record
/// (or scans the table) and either completes or fails.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Name of the table this store operates on.
    fn table_name(&self) -> &str;

    /// Short backend label, used for logging and server info.
    fn backend(&self) -> &'static str;

    /// Return every record matching `filter`, in the backend's natural order.
    async fn scan(&self, filter: &ScanFilter) -> StoreResult<Vec<Record>>;

    /// Fetch a single record by key.
    async fn get(&self, key: &str) -> StoreResult<Option<Record>>;

    /// Insert or fully replace a record.
    async fn put(&self, record: Record) -> StoreResult<()>;

    /// Apply `update` to the record at `key` and return the full result.
    ///
    /// A missing record is created from the assignments, mirroring the
    /// upsert behavior of document stores.
    async fn update(&self, key: &str, update: &UpdateExpression) -> StoreResult<Record>;

    /// Remove the record at `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// Extract the primary key of a record.
pub fn record_key(record: &Record) -> StoreResult<String> {
    record
        .get(PRIMARY_KEY)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| StoreError::MissingKey(PRIMARY_KEY.to_string()))
}

/// Open the store backend described by `config`.
pub fn open(config: &StoreConfig) -> StoreResult<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match &config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(&config.table_name)),
        StoreBackend::Redb { path } => Arc::new(RedbStore::open(path, &config.table_name)?),
    };

    info!(
        "Opened {} store for table '{}' (region {})",
        store.backend(),
        store.table_name(),
        config.region
    );

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_key() {
        let record = json!({ "id": "abc", "content": "x" });
        let record = record.as_object().unwrap();
        assert_eq!(record_key(record).unwrap(), "abc");
    }

    #[test]
    fn test_record_key_missing() {
        let record = json!({ "content": "x" });
        let result = record_key(record.as_object().unwrap());
        assert!(matches!(result, Err(StoreError::MissingKey(_))));
    }

    #[test]
    fn test_record_key_not_a_string() {
        let record = json!({ "id": 42 });
        assert!(record_key(record.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_open_memory_backend() {
        let config = StoreConfig::default();
        let store = open(&config).unwrap();
        assert_eq!(store.backend(), "memory");
        assert_eq!(store.table_name(), "InstructionTable");
    }

    #[test]
    fn test_open_redb_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::Redb {
                path: dir.path().join("instructions.redb"),
            },
            ..StoreConfig::default()
        };
        let store = open(&config).unwrap();
        assert_eq!(store.backend(), "redb");
    }
}
