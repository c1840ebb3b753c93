//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect info, tracing)
//!     → middleware/ (maintenance gate)
//!     → application handler, or 503
//!
//! /admin/maintenance/* → admin router (never gated)
//! ```

pub mod middleware;
pub mod server;

pub use middleware::MaintenanceGate;
pub use server::HttpServer;
