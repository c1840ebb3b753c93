//! The `StorageClient` contract shared by both backends.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::maintenance::MaintenanceMode;
use crate::store::StoreError;

/// Errors returned by [`StorageClient`] operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store failed the call.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The allow-list payload is not a JSON array of strings.
    #[error("malformed allow-list payload: {0}")]
    MalformedAllowList(#[source] serde_json::Error),
}

impl StorageError {
    /// Corrupt data in the store, as opposed to a store that could not be
    /// reached.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, StorageError::MalformedAllowList(_))
    }

    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        if self.is_corrupt_data() {
            "malformed"
        } else {
            "store"
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// What `disable()` removes from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableScope {
    /// Every key in the store, maintenance-related or not.
    WholeStore,
    /// Only the message and allow-list keys.
    MaintenanceKeys,
}

/// Reads and writes the maintenance message and allow-list.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Blast radius of [`disable`](StorageClient::disable) on this backend.
    fn disable_scope(&self) -> DisableScope;

    /// Current mode. Any read failure is reported as disabled.
    async fn get_maintenance_mode(&self) -> MaintenanceMode;

    /// The allow-list.
    async fn get_allowed_ips(&self) -> StorageResult<Vec<String>>;

    /// Turn maintenance on with `message`.
    async fn set_message(&self, message: Bytes) -> StorageResult<()>;

    /// Replace the allow-list.
    async fn set_allowed_ips(&self, ips: &[String]) -> StorageResult<()>;

    /// Turn maintenance off. See [`disable_scope`](StorageClient::disable_scope).
    async fn disable(&self) -> StorageResult<()>;

    /// Remove the allow-list only.
    async fn disable_allowed_ips(&self) -> StorageResult<()>;
}
