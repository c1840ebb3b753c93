//! The maintenance mode snapshot.

use bytes::Bytes;

/// Maintenance state as read from the store at the start of a request.
///
/// Immutable once built. A request-level decision to let traffic through is
/// recorded next to it in [`MaintenanceContext`](super::MaintenanceContext),
/// never by changing the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaintenanceMode {
    enabled: bool,
    message: Bytes,
}

impl MaintenanceMode {
    /// Maintenance is on and `message` is served to blocked callers.
    pub fn enabled(message: impl Into<Bytes>) -> Self {
        Self {
            enabled: true,
            message: message.into(),
        }
    }

    /// Maintenance is off.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build from the raw message key: present means enabled.
    pub fn from_message(message: Option<Bytes>) -> Self {
        match message {
            Some(message) => Self::enabled(message),
            None => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn message(&self) -> &Bytes {
        &self.message
    }
}
