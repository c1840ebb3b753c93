//! Maintenance state carried through a request.
//!
//! # Data Flow
//! ```text
//! StorageClient::get_maintenance_mode()
//!     → MaintenanceMode (immutable snapshot)
//!     → MaintenanceContext::loaded(mode)      SetMaintenance
//!     → context.with_bypass(..)               AllowByIP, optional
//!     → context.is_enforced()                 ResponseIfMaintenanceMode
//! ```

pub mod context;
pub mod mode;

pub use context::{Bypass, MaintenanceContext};
pub use mode::MaintenanceMode;

/// Store key whose presence turns maintenance on; the value is the message.
pub const MAINTENANCE_KEY: &str = "maintenance";

/// Store key holding the IP allow-list.
pub const ALLOWED_IPS_KEY: &str = "maintenance_allowed_ips";
