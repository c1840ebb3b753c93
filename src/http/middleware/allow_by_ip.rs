//! AllowByIP: exempt allow-listed callers while maintenance is on.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use super::client_ip;
use crate::maintenance::{Bypass, MaintenanceContext};
use crate::observability::metrics;
use crate::storage::StorageClient;

/// What to do when the allow-list cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowListPolicy {
    /// Let the request through; maintenance protection is lifted for it.
    #[default]
    FailOpen,
    /// Keep the request under maintenance.
    FailClosed,
}

/// State for the AllowByIP stage.
#[derive(Clone)]
pub struct AllowByIpState {
    pub client: Arc<dyn StorageClient>,
    pub policy: AllowListPolicy,
    pub trust_proxy_headers: bool,
}

/// Optional middle stage.
pub async fn allow_by_ip(
    State(state): State<AllowByIpState>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = match MaintenanceContext::from_request(&req) {
        Ok(ctx) => ctx.clone(),
        Err(e) => {
            tracing::error!(error = %e, "AllowByIP skipped");
            return next.run(req).await;
        }
    };

    // 1. Nothing to exempt from.
    if !ctx.mode().is_enabled() {
        return next.run(req).await;
    }

    // 2. Read the allow-list; failures go through the policy.
    let allowed = match state.client.get_allowed_ips().await {
        Ok(ips) => ips,
        Err(e) => {
            metrics::record_allow_list_error(e.kind());
            match state.policy {
                AllowListPolicy::FailOpen => {
                    tracing::warn!(
                        backend = state.client.backend(),
                        kind = e.kind(),
                        error = %e,
                        "Allow-list unavailable, lifting maintenance for request"
                    );
                    ctx.with_bypass(Bypass::AllowListUnavailable).attach(&mut req);
                }
                AllowListPolicy::FailClosed => {
                    tracing::warn!(
                        backend = state.client.backend(),
                        kind = e.kind(),
                        error = %e,
                        "Allow-list unavailable, keeping maintenance for request"
                    );
                }
            }
            return next.run(req).await;
        }
    };

    // 3. Match the caller.
    let Some(ip) = client_ip::resolve(&req, state.trust_proxy_headers) else {
        tracing::debug!("Caller IP unresolved, allow-list not applied");
        return next.run(req).await;
    };

    let ip = ip.to_string();
    if allowed.iter().any(|entry| *entry == ip) {
        tracing::debug!(ip = %ip, "Caller on allow-list");
        ctx.with_bypass(Bypass::AllowListed).attach(&mut req);
    }

    next.run(req).await
}
