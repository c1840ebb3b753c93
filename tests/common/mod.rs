//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use maintenance_gate::config::GateConfig;
use maintenance_gate::storage::{KeyValueClient, ListClient, StorageClient};
use maintenance_gate::store::{MemoryKeyValueStore, MemoryListStore};
use maintenance_gate::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A running gate plus the handle that stops it.
pub struct TestGate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGate {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gate on an ephemeral local port.
pub async fn start_gate(config: GateConfig, client: Arc<dyn StorageClient>) -> TestGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    let server = HttpServer::new(config, client);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;
    TestGate { addr, shutdown }
}

#[allow(dead_code)]
pub fn key_value_client() -> (Arc<dyn StorageClient>, MemoryKeyValueStore) {
    let store = MemoryKeyValueStore::new();
    (Arc::new(KeyValueClient::new(Arc::new(store.clone()))), store)
}

#[allow(dead_code)]
pub fn list_client() -> (Arc<dyn StorageClient>, MemoryListStore) {
    let store = MemoryListStore::new();
    (Arc::new(ListClient::new(Arc::new(store.clone()))), store)
}

/// Plain HTTP client that never pools or goes through a proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
