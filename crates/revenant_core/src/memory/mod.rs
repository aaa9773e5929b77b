//! # Memory Management
//!
//! Recycling pools for objects that are spawned and despawned every few
//! frames.
//!
//! ## Design Philosophy
//!
//! Objects are created once, then recycled:
//! - Warm pools up front, at load time
//! - Spawning takes from a free list, releasing puts back
//! - Pools only grow, they never free

mod auto_return;
mod config;
mod manager;
mod pool;

pub use auto_return::AutoReturn;
pub use config::{AutoReturnConfig, PoolManagerConfig};
pub use manager::{InstanceId, PoolManager, PoolStatus, Prefab};
pub use pool::{Pool, PoolSlot, Poolable};
