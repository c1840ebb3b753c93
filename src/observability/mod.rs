//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! middleware / storage / admin:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (gate outcomes, allow-list failures)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
