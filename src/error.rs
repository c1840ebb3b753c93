//! Pipeline error type.

use thiserror::Error;

/// Faults in how the maintenance pipeline was assembled.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GateError {
    /// A stage ran without SetMaintenance ahead of it.
    #[error("maintenance context missing; SetMaintenance must run before this stage")]
    MissingContext,
}
