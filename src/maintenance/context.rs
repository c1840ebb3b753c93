//! Request-scoped maintenance context.
//!
//! SetMaintenance stores a [`MaintenanceContext`] in the request extensions.
//! Later stages read it back through [`MaintenanceContext::from_request`],
//! which reports a missing slot as [`GateError::MissingContext`] instead of
//! panicking.

use axum::http::Request;

use super::mode::MaintenanceMode;
use crate::error::GateError;

/// Why a request is let through while maintenance is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bypass {
    /// The caller's IP is on the allow-list.
    AllowListed,
    /// The allow-list could not be read and the fail-open policy applied.
    AllowListUnavailable,
}

impl Bypass {
    pub fn as_str(self) -> &'static str {
        match self {
            Bypass::AllowListed => "allow_listed",
            Bypass::AllowListUnavailable => "allow_list_unavailable",
        }
    }
}

/// The maintenance snapshot plus any per-request override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceContext {
    mode: MaintenanceMode,
    bypass: Option<Bypass>,
}

impl MaintenanceContext {
    /// A freshly loaded snapshot with no override.
    pub fn loaded(mode: MaintenanceMode) -> Self {
        Self { mode, bypass: None }
    }

    /// A copy of this context carrying `bypass`. The snapshot is unchanged.
    pub fn with_bypass(&self, bypass: Bypass) -> Self {
        Self {
            mode: self.mode.clone(),
            bypass: Some(bypass),
        }
    }

    pub fn mode(&self) -> &MaintenanceMode {
        &self.mode
    }

    pub fn bypass(&self) -> Option<Bypass> {
        self.bypass
    }

    /// True when this request must receive the maintenance response.
    pub fn is_enforced(&self) -> bool {
        self.mode.is_enabled() && self.bypass.is_none()
    }

    /// Read the context attached by SetMaintenance.
    pub fn from_request<B>(req: &Request<B>) -> Result<&Self, GateError> {
        req.extensions()
            .get::<Self>()
            .ok_or(GateError::MissingContext)
    }

    /// Attach (or replace) the context on a request.
    pub fn attach<B>(self, req: &mut Request<B>) {
        req.extensions_mut().insert(self);
    }
}
