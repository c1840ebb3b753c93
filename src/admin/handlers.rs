use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::storage::{DisableScope, StorageClient, StorageError};

/// Snapshot returned by `GET /admin/maintenance`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaintenanceStatus {
    pub backend: String,
    pub enabled: bool,
    pub message: Option<String>,
    pub allowed_ips: Vec<String>,
    /// Set when the allow-list could not be read.
    pub allow_list_error: Option<String>,
    /// True when disabling flushes the whole store.
    pub disable_flushes_store: bool,
}

/// Errors surfaced to operators.
#[derive(Debug)]
pub enum AdminError {
    BadRequest(String),
    Storage(StorageError),
}

impl From<StorageError> for AdminError {
    fn from(e: StorageError) -> Self {
        AdminError::Storage(e)
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            AdminError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AdminError::Storage(e) => {
                tracing::error!(error = %e, "Maintenance store write failed");
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
            }
        }
    }
}

pub async fn get_status(State(client): State<Arc<dyn StorageClient>>) -> Json<MaintenanceStatus> {
    let mode = client.get_maintenance_mode().await;
    let (allowed_ips, allow_list_error) = match client.get_allowed_ips().await {
        Ok(ips) => (ips, None),
        Err(e) => (Vec::new(), Some(e.to_string())),
    };

    Json(MaintenanceStatus {
        backend: client.backend().to_string(),
        enabled: mode.is_enabled(),
        message: mode
            .is_enabled()
            .then(|| String::from_utf8_lossy(mode.message()).into_owned()),
        allowed_ips,
        allow_list_error,
        disable_flushes_store: client.disable_scope() == DisableScope::WholeStore,
    })
}

pub async fn put_message(
    State(client): State<Arc<dyn StorageClient>>,
    body: Bytes,
) -> Result<StatusCode, AdminError> {
    if body.is_empty() {
        return Err(AdminError::BadRequest("maintenance message must not be empty".into()));
    }

    client.set_message(body).await?;
    tracing::info!(backend = client.backend(), "Maintenance enabled");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_maintenance(
    State(client): State<Arc<dyn StorageClient>>,
) -> Result<StatusCode, AdminError> {
    client.disable().await?;
    tracing::info!(
        backend = client.backend(),
        scope = ?client.disable_scope(),
        "Maintenance disabled"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn put_allowed_ips(
    State(client): State<Arc<dyn StorageClient>>,
    Json(ips): Json<Vec<String>>,
) -> Result<StatusCode, AdminError> {
    // Stored in the form the gate compares callers against.
    let ips = ips
        .iter()
        .map(|ip| match ip.trim().parse::<IpAddr>() {
            Ok(addr) => Ok(addr.to_canonical().to_string()),
            Err(_) => Err(AdminError::BadRequest(format!("'{ip}' is not an IP address"))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    client.set_allowed_ips(&ips).await?;
    tracing::info!(backend = client.backend(), count = ips.len(), "Allow-list replaced");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_allowed_ips(
    State(client): State<Arc<dyn StorageClient>>,
) -> Result<StatusCode, AdminError> {
    client.disable_allowed_ips().await?;
    tracing::info!(backend = client.backend(), "Allow-list removed");
    Ok(StatusCode::NO_CONTENT)
}
