//! # Revenant Core
//!
//! Object pooling for frame-driven games:
//! - Grow-on-demand pools that recycle instead of reallocating
//! - A manager that routes releases back to the owning pool
//! - Timed auto-return of short-lived instances
//!
//! ## Example
//!
//! ```rust,ignore
//! use revenant_core::{PoolManager, PoolManagerConfig};
//!
//! let mut pools = PoolManager::with_prefabs(PoolManagerConfig::default(), [bullet.clone()])?;
//! let shot = pools.spawn_object(&bullet, muzzle, aim);
//! // ...
//! pools.release_object(shot);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod memory;

pub use error::{PoolError, PoolResult};
pub use memory::{
    AutoReturn, AutoReturnConfig, InstanceId, Pool, PoolManager, PoolManagerConfig, PoolSlot,
    PoolStatus, Poolable, Prefab,
};
