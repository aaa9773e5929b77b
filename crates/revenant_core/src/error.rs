//! # Pool Error Types
//!
//! Caller-contract violations raised by the pool manager. Missing-entry
//! conditions (releasing an unknown instance) are logged instead.

use thiserror::Error;

/// Errors that can occur while declaring pools.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A pool for this prefab already exists; warming is a one-time declaration.
    #[error("pool for prefab {template} has already been created")]
    AlreadyWarmed {
        /// Name of the prefab that was warmed twice.
        template: String,
    },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
