//! Storage client for redis-style stores.
//!
//! The allow-list is a native list. `set_allowed_ips` runs as one
//! transaction (delete, then push each entry to the head), so the stored
//! order is the reverse of the input. Readers racing the transaction may see
//! an empty or partial list. `disable()` removes only the two maintenance
//! keys.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::client::{DisableScope, StorageClient, StorageResult};
use crate::maintenance::{MaintenanceMode, ALLOWED_IPS_KEY, MAINTENANCE_KEY};
use crate::store::{ListOp, ListStore};

/// [`StorageClient`] over a [`ListStore`].
#[derive(Clone)]
pub struct ListClient {
    store: Arc<dyn ListStore>,
}

impl ListClient {
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StorageClient for ListClient {
    fn backend(&self) -> &'static str {
        "list"
    }

    fn disable_scope(&self) -> DisableScope {
        DisableScope::MaintenanceKeys
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
        Ok(self.store.lrange(ALLOWED_IPS_KEY).await?)
    }

    async fn set_message(&self, message: Bytes) -> StorageResult<()> {
        self.store.set(MAINTENANCE_KEY, message).await?;
        Ok(())
    }

    async fn set_allowed_ips(&self, ips: &[String]) -> StorageResult<()> {
        let mut ops = Vec::with_capacity(ips.len() + 1);
        ops.push(ListOp::Del(ALLOWED_IPS_KEY.to_string()));
        ops.extend(
            ips.iter()
                .map(|ip| ListOp::PushFront(ALLOWED_IPS_KEY.to_string(), ip.clone())),
        );
        self.store.exec(ops).await?;
        Ok(())
    }

    async fn disable(&self) -> StorageResult<()> {
        self.store.del(&[ALLOWED_IPS_KEY, MAINTENANCE_KEY]).await?;
        Ok(())
    }

    async fn disable_allowed_ips(&self) -> StorageResult<()> {
        self.store.del(&[ALLOWED_IPS_KEY]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use crate::store::MemoryListStore;
    use std::collections::HashSet;

    fn client() -> (ListClient, MemoryListStore) {
        let store = MemoryListStore::new();
        (ListClient::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_allowed_ips_roundtrip_as_set() {
        let (client, _) = client();
        let ips = vec!["127.0.0.1".to_string(), "10.0.0.1".to_string()];
        client.set_allowed_ips(&ips).await.unwrap();

        let stored = client.get_allowed_ips().await.unwrap();
        assert_eq!(stored, vec!["10.0.0.1", "127.0.0.1"]);
        assert_eq!(
            stored.into_iter().collect::<HashSet<_>>(),
            ips.into_iter().collect::<HashSet<_>>()
        );
    }

    #[tokio::test]
    async fn test_set_allowed_ips_replaces_previous_list() {
        let (client, _) = client();
        client.set_allowed_ips(&["1.1.1.1".to_string()]).await.unwrap();
        client.set_allowed_ips(&["2.2.2.2".to_string()]).await.unwrap();
        assert_eq!(client.get_allowed_ips().await.unwrap(), vec!["2.2.2.2"]);

        client.set_allowed_ips(&[]).await.unwrap();
        assert!(client.get_allowed_ips().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_error_surfaces_from_allow_list_read() {
        let (client, store) = client();
        store.set_unavailable(true);

        let err = client.get_allowed_ips().await.unwrap_err();
        assert!(matches!(err, StorageError::Store(_)));
        assert!(!err.is_corrupt_data());
        assert!(!client.get_maintenance_mode().await.is_enabled());
    }

    #[tokio::test]
    async fn test_disable_is_scoped_to_maintenance_keys() {
        let (client, store) = client();
        store.set("unrelated", Bytes::from_static(b"x")).await.unwrap();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        client.set_allowed_ips(&["127.0.0.1".to_string()]).await.unwrap();

        assert_eq!(client.disable_scope(), DisableScope::MaintenanceKeys);
        client.disable().await.unwrap();

        assert!(!client.get_maintenance_mode().await.is_enabled());
        assert!(client.get_allowed_ips().await.unwrap().is_empty());
        assert!(store.contains_key("unrelated"));
    }

    #[tokio::test]
    async fn test_disable_allowed_ips_keeps_message() {
        let (client, _) = client();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        client.set_allowed_ips(&["127.0.0.1".to_string()]).await.unwrap();

        client.disable_allowed_ips().await.unwrap();
        assert!(client.get_allowed_ips().await.unwrap().is_empty());
        assert!(client.get_maintenance_mode().await.is_enabled());
    }
}
