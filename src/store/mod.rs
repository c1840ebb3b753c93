//! External key-value store collaborators.
//!
//! # Data Flow
//! ```text
//! StorageClient (storage/)
//!     → KeyValueStore  (memcached-style: get/set/delete/flush_all)
//!     → ListStore      (redis-style: get/set/del/lrange + batched exec)
//!     → external service, or memory.rs for development and tests
//! ```
//!
//! # Design Decisions
//! - Wire protocols live behind these traits; nothing above this module
//!   knows which technology holds the keys
//! - A cache miss is `Ok(None)`, never an error
//! - `ListStore::exec` checks every op before applying any, then applies
//!   them one at a time (readers may observe the intermediate state)

pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use memory::{MemoryKeyValueStore, MemoryListStore};

/// Errors surfaced by a store collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or refused the command.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A list command hit a plain value, or the other way round.
    #[error("wrong type for key '{key}'")]
    WrongType { key: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A memcached-style store: opaque values under string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a value. `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>>;

    /// Overwrite a value.
    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()>;

    /// Remove a key. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Remove every key in the store.
    async fn flush_all(&self) -> StoreResult<()>;
}

/// One step of a [`ListStore::exec`] batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOp {
    /// Delete the key, whatever its type.
    Del(String),
    /// Insert at the head of the list, creating it if missing (`LPUSH`).
    PushFront(String, String),
}

/// A redis-style store with native list values.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Fetch a plain value. `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>>;

    /// Overwrite a plain value.
    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()>;

    /// Delete the given keys. Missing keys are ignored.
    async fn del(&self, keys: &[&str]) -> StoreResult<()>;

    /// The whole list under `key`, head first. A missing key is an empty list.
    async fn lrange(&self, key: &str) -> StoreResult<Vec<String>>;

    /// Run a batch of ops as one transaction.
    async fn exec(&self, ops: Vec<ListOp>) -> StoreResult<()>;
}
