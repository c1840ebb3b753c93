//! Maintenance middleware pipeline.
//!
//! # Data Flow
//! ```text
//! request
//!     → set_maintenance.rs      load MaintenanceMode into the request
//!     → allow_by_ip.rs          optional: bypass for allow-listed callers
//!     → respond.rs              503 with the stored message, or delegate
//!     → wrapped handler
//! ```
//!
//! Each stage is an axum `from_fn` middleware and can be layered by hand.
//! [`MaintenanceGate`] layers them in the only order that works.
//! A stage that finds no context logs the fault and lets the request
//! through rather than failing it.

pub mod allow_by_ip;
pub mod client_ip;
pub mod respond;
pub mod set_maintenance;

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};

pub use allow_by_ip::{allow_by_ip, AllowByIpState, AllowListPolicy};
pub use respond::{maintenance_response, response_if_maintenance_mode};
pub use set_maintenance::set_maintenance;

use crate::config::GateSettings;
use crate::storage::StorageClient;

/// Builder that wraps a router in SetMaintenance → [AllowByIP] →
/// ResponseIfMaintenanceMode.
#[derive(Clone)]
pub struct MaintenanceGate {
    client: Arc<dyn StorageClient>,
    allow_by_ip: bool,
    policy: AllowListPolicy,
    trust_proxy_headers: bool,
}

impl MaintenanceGate {
    /// A gate without the AllowByIP stage.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            allow_by_ip: false,
            policy: AllowListPolicy::default(),
            trust_proxy_headers: true,
        }
    }

    pub fn from_settings(client: Arc<dyn StorageClient>, settings: &GateSettings) -> Self {
        Self::new(client)
            .allow_by_ip(settings.allow_by_ip)
            .allow_list_policy(settings.allow_list_policy)
            .trust_proxy_headers(settings.trust_proxy_headers)
    }

    /// Include the AllowByIP stage.
    pub fn allow_by_ip(mut self, enabled: bool) -> Self {
        self.allow_by_ip = enabled;
        self
    }

    pub fn allow_list_policy(mut self, policy: AllowListPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    /// Wrap every route of `router` in the pipeline.
    pub fn layer<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // Router::layer wraps outward: the last layer added runs first.
        let mut router = router.layer(from_fn(response_if_maintenance_mode));

        if self.allow_by_ip {
            let state = AllowByIpState {
                client: self.client.clone(),
                policy: self.policy,
                trust_proxy_headers: self.trust_proxy_headers,
            };
            router = router.layer(from_fn_with_state(state, allow_by_ip));
        }

        router.layer(from_fn_with_state(self.client.clone(), set_maintenance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::ALLOWED_IPS_KEY;
    use crate::storage::{KeyValueClient, ListClient};
    use crate::store::{KeyValueStore, ListStore, MemoryKeyValueStore, MemoryListStore};
    use axum::{
        body::{to_bytes, Body},
        extract::ConnectInfo,
        http::{header, Request, StatusCode},
        routing::get,
    };
    use bytes::Bytes;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    const OK_BODY: &str = "Request Succeeded";

    fn app() -> Router {
        Router::new().route("/", get(|| async { OK_BODY }))
    }

    fn request_from(ip: [u8; 4]) -> Request<Body> {
        Request::builder()
            .uri("/")
            .extension(ConnectInfo(SocketAddr::from((ip, 40000))))
            .body(Body::empty())
            .unwrap()
    }

    fn forwarded_request() -> Request<Body> {
        Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.9")
            .extension(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 1))))
            .body(Body::empty())
            .unwrap()
    }

    async fn call(router: Router, req: Request<Body>) -> (StatusCode, Bytes) {
        let res = router.oneshot(req).await.unwrap();
        let status = res.status();
        (status, to_bytes(res.into_body(), usize::MAX).await.unwrap())
    }

    fn key_value() -> (Arc<dyn StorageClient>, MemoryKeyValueStore) {
        let store = MemoryKeyValueStore::new();
        (Arc::new(KeyValueClient::new(Arc::new(store.clone()))), store)
    }

    fn list() -> (Arc<dyn StorageClient>, MemoryListStore) {
        let store = MemoryListStore::new();
        (Arc::new(ListClient::new(Arc::new(store.clone()))), store)
    }

    #[tokio::test]
    async fn test_no_message_forwards() {
        let (client, _) = key_value();
        let router = MaintenanceGate::new(client).allow_by_ip(true).layer(app());

        let (status, body) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, OK_BODY);
    }

    #[tokio::test]
    async fn test_message_blocks_every_caller_without_allow_by_ip() {
        let (client, _) = key_value();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        client.set_allowed_ips(&["127.0.0.1".to_string()]).await.unwrap();
        let router = MaintenanceGate::new(client).layer(app());

        let res = router.oneshot(request_from([127, 0, 0, 1])).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(to_bytes(res.into_body(), usize::MAX).await.unwrap(), "down");
    }

    #[tokio::test]
    async fn test_message_without_allow_list_blocks() {
        let (client, _) = key_value();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        let router = MaintenanceGate::new(client).allow_by_ip(true).layer(app());

        let (status, body) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "down");
    }

    #[tokio::test]
    async fn test_allow_listed_caller_is_served() {
        for client in [key_value().0, list().0] {
            client.set_message(Bytes::from_static(b"down")).await.unwrap();
            client.set_allowed_ips(&["127.0.0.1".to_string()]).await.unwrap();
            let router = MaintenanceGate::new(client).allow_by_ip(true).layer(app());

            let (status, body) = call(router, request_from([127, 0, 0, 1])).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, OK_BODY);
        }
    }

    #[tokio::test]
    async fn test_caller_not_on_allow_list_is_blocked() {
        let (client, _) = key_value();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        client.set_allowed_ips(&["127.0.0.2".to_string()]).await.unwrap();
        let router = MaintenanceGate::new(client).allow_by_ip(true).layer(app());

        let (status, _) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_forwarded_for_is_matched_when_trusted() {
        let (client, _) = key_value();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        client.set_allowed_ips(&["203.0.113.9".to_string()]).await.unwrap();
        let gate = MaintenanceGate::new(client).allow_by_ip(true);

        let (status, _) = call(gate.clone().layer(app()), forwarded_request()).await;
        assert_eq!(status, StatusCode::OK);

        let untrusted = gate.trust_proxy_headers(false).layer(app());
        let (status, _) = call(untrusted, forwarded_request()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_null_allow_list_still_blocks() {
        let (client, store) = key_value();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        store
            .set(ALLOWED_IPS_KEY, Bytes::from_static(b"null"))
            .await
            .unwrap();
        let router = MaintenanceGate::new(client).allow_by_ip(true).layer(app());

        let (status, body) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "down");
    }

    #[tokio::test]
    async fn test_malformed_allow_list_fails_open() {
        let (client, store) = key_value();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        store
            .set(ALLOWED_IPS_KEY, Bytes::from_static(b"{oops"))
            .await
            .unwrap();
        let router = MaintenanceGate::new(client).allow_by_ip(true).layer(app());

        let (status, body) = call(router, request_from([127, 0, 0, 2])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, OK_BODY);
    }

    #[tokio::test]
    async fn test_unreadable_allow_list_fails_open() {
        let (client, store) = list();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        // Make only the list read fail: the message stays readable as a
        // plain value while the allow-list key holds the wrong type.
        store
            .set(ALLOWED_IPS_KEY, Bytes::from_static(b"not a list"))
            .await
            .unwrap();
        let router = MaintenanceGate::new(client).allow_by_ip(true).layer(app());

        let (status, _) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unreadable_allow_list_fail_closed() {
        let (client, store) = list();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        store
            .set(ALLOWED_IPS_KEY, Bytes::from_static(b"not a list"))
            .await
            .unwrap();
        let router = MaintenanceGate::new(client)
            .allow_by_ip(true)
            .allow_list_policy(AllowListPolicy::FailClosed)
            .layer(app());

        let (status, body) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "down");
    }

    #[tokio::test]
    async fn test_unreachable_store_reads_as_disabled() {
        let (client, store) = key_value();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        store.set_unavailable(true);
        let router = MaintenanceGate::new(client).allow_by_ip(true).layer(app());

        let (status, _) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_set_maintenance_does_not_panic() {
        let (client, _) = key_value();
        client.set_message(Bytes::from_static(b"down")).await.unwrap();
        let state = AllowByIpState {
            client,
            policy: AllowListPolicy::FailOpen,
            trust_proxy_headers: true,
        };
        let router = app()
            .layer(from_fn(response_if_maintenance_mode))
            .layer(from_fn_with_state(state, allow_by_ip));

        let (status, body) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, OK_BODY);
    }

    #[tokio::test]
    async fn test_store_change_visible_on_next_request() {
        let (client, _) = list();
        let router = MaintenanceGate::new(client.clone()).layer(app());

        let (status, _) = call(router.clone(), request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);

        client.set_message(Bytes::from_static(b"back soon")).await.unwrap();
        let (status, body) = call(router.clone(), request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "back soon");

        client.disable().await.unwrap();
        let (status, _) = call(router, request_from([127, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
    }
}
