//! # Cart Storage Backends
//!
//! The key-value seam the cart store persists through.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CartStorage implementations                        │
//! │                                                                         │
//! │   CartStore ──► persistence writer ──► CartStorage                     │
//! │                                          │                              │
//! │                         ┌────────────────┴────────────────┐             │
//! │                         ▼                                 ▼             │
//! │                  MemoryStorage                       Database           │
//! │                  (HashMap, tests,                    (SQLite kv_store,  │
//! │                   diagnostics)                        storefront-db)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backends store opaque strings. Encoding and validation live in
//! `storefront_core::codec`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use storefront_db::{Database, DbError};
use thiserror::Error;
use tracing::debug;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised by a storage backend.
///
/// The cart store never surfaces these to its callers; they are logged.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite backend failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// The backend refused the write.
    #[error("Write rejected for key '{key}'")]
    WriteRejected { key: String },

    /// The backend could not be read.
    #[error("Read failed for key '{key}'")]
    ReadFailed { key: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Trait
// =============================================================================

/// A durable key-value backend for the serialized cart.
pub trait CartStorage: Send + Sync + 'static {
    /// Reads the value under `key`. `Ok(None)` when nothing was ever stored.
    fn load(&self, key: &str) -> impl Future<Output = StorageResult<Option<String>>> + Send;

    /// Replaces the value under `key`.
    fn save(&self, key: &str, value: &str) -> impl Future<Output = StorageResult<()>> + Send;
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// Process-local storage. Clones share the same map.
///
/// Reads and writes can be switched to fail, which is how the store's
/// best-effort behaviour is exercised.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with one record.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.insert(key, value);
        storage
    }

    /// Inserts a record directly, bypassing the write counter.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries().insert(key.into(), value.into());
    }

    /// Returns the raw record under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    /// Makes subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds complete records; keep using it.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CartStorage for MemoryStorage {
    async fn load(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed { key: key.to_string() });
        }
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteRejected { key: key.to_string() });
        }
        self.insert(key, value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// SQLite Backend
// =============================================================================

impl CartStorage for Database {
    async fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.kv().get(key).await?)
    }

    async fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key = %key, "Persisting cart record to SQLite");
        self.kv().put(key, value).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_db::DbConfig;

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();

        assert_eq!(storage.load("cart").await.unwrap(), None);

        storage.save("cart", "payload").await.unwrap();
        assert_eq!(storage.load("cart").await.unwrap().as_deref(), Some("payload"));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.save("cart", "shared").await.unwrap();
        assert_eq!(other.get("cart").as_deref(), Some("shared"));
    }

    #[tokio::test]
    async fn test_memory_storage_failures() {
        let storage = MemoryStorage::with_entry("cart", "old");

        storage.set_fail_writes(true);
        assert!(matches!(
            storage.save("cart", "new").await,
            Err(StorageError::WriteRejected { .. })
        ));
        assert_eq!(storage.get("cart").as_deref(), Some("old"));
        assert_eq!(storage.write_count(), 0);

        storage.set_fail_reads(true);
        assert!(matches!(
            storage.load("cart").await,
            Err(StorageError::ReadFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_sqlite_storage_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.load("cart").await.unwrap(), None);

        db.save("cart", r#"{"items":[]}"#).await.unwrap();
        db.save("cart", r#"{"items":[1]}"#).await.unwrap();

        assert_eq!(db.load("cart").await.unwrap().as_deref(), Some(r#"{"items":[1]}"#));
    }

    #[tokio::test]
    async fn test_sqlite_storage_closed_pool_errors() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(matches!(
            db.save("cart", "x").await,
            Err(StorageError::Database(_))
        ));
    }
}
