//! SetMaintenance: load the mode from the store into the request.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::maintenance::MaintenanceContext;
use crate::storage::StorageClient;

/// First stage. One store round-trip per request, no caching.
pub async fn set_maintenance(
    State(client): State<Arc<dyn StorageClient>>,
    mut req: Request,
    next: Next,
) -> Response {
    let mode = client.get_maintenance_mode().await;
    tracing::debug!(
        backend = client.backend(),
        enabled = mode.is_enabled(),
        "Maintenance mode loaded"
    );

    MaintenanceContext::loaded(mode).attach(&mut req);
    next.run(req).await
}
