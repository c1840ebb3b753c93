//! Operator management surface.
//!
//! Exposes the write path of the [`StorageClient`] over HTTP. Mounted next
//! to, not behind, the maintenance gate so it stays reachable while
//! maintenance is on.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::storage::StorageClient;

pub use handlers::{AdminError, MaintenanceStatus};

pub const ADMIN_PREFIX: &str = "/admin/maintenance";

/// Build the admin router.
pub fn router(client: Arc<dyn StorageClient>) -> Router {
    Router::new()
        .route(
            ADMIN_PREFIX,
            get(handlers::get_status).delete(handlers::delete_maintenance),
        )
        .route(&format!("{ADMIN_PREFIX}/message"), put(handlers::put_message))
        .route(
            &format!("{ADMIN_PREFIX}/allowed-ips"),
            put(handlers::put_allowed_ips).delete(handlers::delete_allowed_ips),
        )
        .with_state(client)
}
