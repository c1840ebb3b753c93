//! Storage client for memcached-style stores.
//!
//! The allow-list is stored as a JSON array under a single key. `disable()`
//! flushes the whole store, not just the maintenance keys.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::client::{DisableScope, StorageClient, StorageError, StorageResult};
use crate::maintenance::{MaintenanceMode, ALLOWED_IPS_KEY, MAINTENANCE_KEY};
use crate::store::KeyValueStore;

/// [`StorageClient`] over a [`KeyValueStore`].
#[derive(Clone)]
pub struct KeyValueClient {
    store: Arc<dyn KeyValueStore>,
}

impl KeyValueClient {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StorageClient for KeyValueClient {
    fn backend(&self) -> &'static str {
        "key_value"
    }

    fn disable_scope(&self) -> DisableScope {
        DisableScope::WholeStore
    }

    async fn get_maintenance_mode(&self) -> MaintenanceMode {
        match self.store.get(MAINTENANCE_KEY).await {
            Ok(message) => MaintenanceMode::from_message(message),
            Err(e) => {
                tracing::warn!(backend = self.backend(), error = %e, "Maintenance key unreadable, treating as disabled");
                MaintenanceMode::disabled()
            }
        }
    }

    async fn get_allowed_ips(&self) -> StorageResult<Vec<String>> {
        let payload = match self.store.get(ALLOWED_IPS_KEY).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                // Read errors look the same as a miss on this backend.
                tracing::warn!(backend = self.backend(), error = %e, "Allow-list unreadable, using empty list");
                return Ok(Vec::new());
            }
        };

        // `null` is how an empty list has always been written.
        let ips: Option<Vec<String>> =
            serde_json::from_slice(&payload).map_err(StorageError::MalformedAllowList)?;
        Ok(ips.unwrap_or_default())
    }

    async fn set_message(&self, message: Bytes) -> StorageResult<()> {
        self.store.set(MAINTENANCE_KEY, message).await?;
        Ok(())
    }

    async fn set_allowed_ips(&self, ips: &[String]) -> StorageResult<()> {
        let payload = serde_json::to_vec(ips).map_err(StorageError::MalformedAllowList)?;
        self.store.set(ALLOWED_IPS_KEY, Bytes::from(payload)).await?;
        Ok(())
    }

    async fn disable(&self) -> StorageResult<()> {
        self.store.flush_all().await?;
        Ok(())
    }

    async fn disable_allowed_ips(&self) -> StorageResult<()> {
        self.store.delete(ALLOWED_IPS_KEY).await?;
        Ok(())
    }
}
