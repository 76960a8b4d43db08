//! Storage medium port
//!
//! A key-value medium holding JSON records per [`Collection`]. Writes are
//! synchronous and visible to the next read in the same process. There is
//! no cross-key transaction.

use consent_domain::Collection;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while reading or writing the medium
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error in {collection}: {message}")]
    Serialization {
        collection: Collection,
        message: String,
    },

    #[error("Record already exists: {collection}/{key}")]
    AlreadyExists { collection: Collection, key: String },

    #[error("Storage error: {0}")]
    Other(String),
}

/// Keyed persistence medium
///
/// Implementations use interior mutability; a single logical writer is
/// assumed, so there is no conflict resolution between writers.
pub trait StorageMedium: Send + Sync {
    fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError>;

    /// Every `(key, record)` in the collection, in insertion order
    fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, StoreError>;

    /// Insert or replace the record at `key`
    fn put(&self, collection: Collection, key: &str, record: Value) -> Result<(), StoreError>;

    /// Returns `true` if a record was removed
    fn delete(&self, collection: Collection, key: &str) -> Result<bool, StoreError>;
}
