//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the application router and wrap it in the maintenance gate
//! - Mount the admin router beside the gate, not behind it
//! - Wire up tracing middleware
//! - Serve with connect info (needed for caller IP) and graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::config::GateConfig;
use crate::http::middleware::MaintenanceGate;
use crate::lifecycle::{shutdown, signals};
use crate::storage::StorageClient;

/// Body served by the placeholder application when the gate lets a request
/// through.
pub const APP_RESPONSE: &str = "Request Succeeded";

/// HTTP server fronted by the maintenance gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
}

impl HttpServer {
    /// Create a server that gates the placeholder application.
    pub fn new(config: GateConfig, client: Arc<dyn StorageClient>) -> Self {
        let app = Router::new()
            .route("/", any(app_handler))
            .route("/{*path}", any(app_handler));
        Self::with_app(config, client, app)
    }

    /// Create a server that gates `app`.
    pub fn with_app(config: GateConfig, client: Arc<dyn StorageClient>, app: Router) -> Self {
        let router = Self::build_router(&config, client, app);
        Self { router, config }
    }

    fn build_router(config: &GateConfig, client: Arc<dyn StorageClient>, app: Router) -> Router {
        tracing::info!(
            backend = client.backend(),
            allow_by_ip = config.gate.allow_by_ip,
            allow_list_policy = ?config.gate.allow_list_policy,
            "Maintenance gate configured"
        );

        MaintenanceGate::from_settings(client.clone(), &config.gate)
            .layer(app)
            .merge(admin::router(client))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until a signal arrives or `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    () = shutdown::wait(shutdown_rx) => {}
                    () = signals::shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

async fn app_handler() -> &'static str {
    APP_RESPONSE
}
