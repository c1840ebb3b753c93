//! ResponseIfMaintenanceMode: serve the 503 or hand the request on.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::maintenance::MaintenanceContext;
use crate::observability::metrics;

/// Last stage.
pub async fn response_if_maintenance_mode(req: Request, next: Next) -> Response {
    let ctx = match MaintenanceContext::from_request(&req) {
        Ok(ctx) => ctx.clone(),
        Err(e) => {
            tracing::error!(error = %e, "Maintenance check skipped");
            return next.run(req).await;
        }
    };

    if ctx.is_enforced() {
        metrics::record_outcome("blocked");
        return maintenance_response(ctx.mode().message().clone());
    }

    match ctx.bypass() {
        Some(bypass) => {
            tracing::debug!(reason = bypass.as_str(), "Maintenance bypassed");
            metrics::record_outcome("bypassed");
        }
        None => metrics::record_outcome("served"),
    }

    next.run(req).await
}

/// `503` carrying the stored message verbatim.
pub fn maintenance_response(message: Bytes) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}
