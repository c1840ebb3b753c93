//! HTTP maintenance-mode gate.
//!
//! While a maintenance message is set in the shared store, every request
//! except those from allow-listed IPs receives `503` with that message.
//!
//! ```text
//! request → SetMaintenance → [AllowByIP] → ResponseIfMaintenanceMode → app
//!                 │               │
//!                 └── StorageClient (key_value | list) ── store
//! ```

pub mod admin;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod maintenance;
pub mod observability;
pub mod storage;
pub mod store;

pub use config::GateConfig;
pub use error::GateError;
pub use http::{HttpServer, MaintenanceGate};
pub use lifecycle::Shutdown;
pub use maintenance::{MaintenanceContext, MaintenanceMode};
pub use storage::{build_client, ClientKind, StorageClient};
