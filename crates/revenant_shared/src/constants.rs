//! # Runtime Constants
//!
//! Tuning values shared by the pool manager and the frame driver.
//! Config files override the ones that have a config counterpart.

use crate::math::Vec3;

// =============================================================================
// POOLS
// =============================================================================

/// Where idle instances are parked, far outside any camera.
pub const PARKING_POSITION: Vec3 = Vec3::splat(-1000.0);

/// Instances pre-created per listed prefab when the manager starts.
pub const DEFAULT_INIT_SIZE: usize = 5;

/// Pool size used when a prefab is spawned without being warmed first.
pub const DEFAULT_LAZY_WARM_SIZE: usize = 1;

// =============================================================================
// TIMERS
// =============================================================================

/// Default lifetime of an auto-returned instance, in seconds.
pub const DEFAULT_AUTO_RETURN_SECS: f32 = 3.0;

/// Frames between two stale-listener sweeps (about 5s at 60 FPS).
pub const DEFAULT_SWEEP_INTERVAL_FRAMES: u64 = 300;
