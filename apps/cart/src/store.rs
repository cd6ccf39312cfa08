//! # Persistent Store
//!
//! Durable key-value storage for the cart snapshot.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PersistentStore (trait)                                                │
//! │  ├── SqliteStore  ──► rocket-db KeyValueRepository (survives restarts)  │
//! │  └── MemoryStore  ──► HashMap (tests, throwaway sessions)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rocket_db::{Database, DbError};
use thiserror::Error;

/// Storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database failed.
    #[error("Storage error: {0}")]
    Database(#[from] DbError),

    /// The store refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value storage that outlives the process.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Reads the value under `key`, `None` if it was never written.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the value under `key`.
    async fn write(&self, key: &str, value: &str) -> StoreResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// Store backed by the local SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        SqliteStore { db }
    }

    /// Returns a reference to the inner Database.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl PersistentStore for SqliteStore {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.db.key_values().get(key).await?)
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        Ok(self.db.key_values().put(key, value).await?)
    }
}

// =============================================================================
// Memory
// =============================================================================

/// Store kept in process memory.
///
/// Writes can be made to fail on demand to exercise the write-failure path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value, as if written by an earlier session.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Makes every following write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current value under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes are disabled".to_string()));
        }

        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_db::DbConfig;

    #[tokio::test]
    async fn test_sqlite_store_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = SqliteStore::new(db);

        assert_eq!(store.read("@RocketShoes:cart").await.unwrap(), None);

        store.write("@RocketShoes:cart", "[]").await.unwrap();
        assert_eq!(
            store.read("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_sqlite_store_reports_closed_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = SqliteStore::new(db);
        store.database().close().await;

        assert!(matches!(
            store.write("k", "v").await,
            Err(StoreError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_store_write_failure() {
        let store = MemoryStore::new().with_entry("k", "old");
        store.set_fail_writes(true);

        assert!(store.write("k", "new").await.is_err());
        assert_eq!(store.get("k").as_deref(), Some("old"));
        assert_eq!(store.write_count(), 0);

        store.set_fail_writes(false);
        store.write("k", "new").await.unwrap();
        assert_eq!(store.get("k").as_deref(), Some("new"));
        assert_eq!(store.write_count(), 1);
    }
}
