//! Maintenance storage subsystem.
//!
//! # Data Flow
//! ```text
//! middleware / admin
//!     → Arc<dyn StorageClient>
//!     → KeyValueClient (key_value.rs)  → KeyValueStore
//!       ListClient     (list.rs)       → ListStore
//! ```
//!
//! # Backend differences
//! | | key_value | list |
//! |---|---|---|
//! | allow-list format | JSON array | native list |
//! | malformed allow-list | `MalformedAllowList` error | not possible |
//! | allow-list read error | empty list | error |
//! | `disable()` | flushes the whole store | deletes the two keys |
//!
//! Reads of the maintenance key never fail: any error means "disabled".
//! Writes return the store's error unchanged and are never retried.

pub mod client;
pub mod key_value;
pub mod list;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use client::{DisableScope, StorageClient, StorageError, StorageResult};
pub use key_value::KeyValueClient;
pub use list::ListClient;

use crate::store::{MemoryKeyValueStore, MemoryListStore};

/// Which backend family to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    #[default]
    KeyValue,
    List,
}

/// Build a client of the given kind over a fresh in-process store.
pub fn build_client(kind: ClientKind) -> Arc<dyn StorageClient> {
    match kind {
        ClientKind::KeyValue => Arc::new(KeyValueClient::new(Arc::new(MemoryKeyValueStore::new()))),
        ClientKind::List => Arc::new(ListClient::new(Arc::new(MemoryListStore::new()))),
    }
}
