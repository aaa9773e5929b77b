//! # Runtime Error Types

use revenant_core::PoolError;
use thiserror::Error;

/// Errors raised while configuring or wiring the runtime.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// The runtime config could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The config file could not be read.
    #[error("failed to read config {path}: {reason}")]
    ConfigIo {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        reason: String,
    },

    /// A pool declaration failed.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// A service of this type is already installed on this thread.
    #[error("service already installed: {0}")]
    ServiceAlreadyInstalled(&'static str),

    /// No service of this type is installed on this thread.
    #[error("service not installed: {0}")]
    ServiceMissing(&'static str),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
