//! # Auto-Return
//!
//! Releases spawned instances after a fixed lifetime (bullets, hit sparks,
//! floating score text). Timers run on frame delta time, not wall clock.

use std::collections::HashMap;

use revenant_shared::diag;

use super::config::AutoReturnConfig;
use super::manager::{InstanceId, PoolManager, Prefab};

/// Countdown timers that hand instances back to their pool.
///
/// Arming an instance that is already armed restarts its timer, mirroring
/// an object being re-enabled. An instance released by other means before
/// its timer fires is harmless: the manager ignores unknown ids.
#[derive(Debug)]
pub struct AutoReturn {
    delay_secs: f32,
    /// Seconds left per armed instance.
    timers: HashMap<InstanceId, f32>,
}

impl AutoReturn {
    /// Creates a scheduler using `config.delay_secs` for [`arm`](Self::arm).
    #[must_use]
    pub fn new(config: &AutoReturnConfig) -> Self {
        Self {
            delay_secs: config.delay_secs,
            timers: HashMap::new(),
        }
    }

    /// Arms `id` with the default delay.
    pub fn arm(&mut self, id: InstanceId) {
        self.arm_for(id, self.delay_secs);
    }

    /// Arms `id` to be released after `delay_secs`, replacing any running timer.
    ///
    /// A non-finite delay is logged and leaves the instance unarmed.
    pub fn arm_for(&mut self, id: InstanceId, delay_secs: f32) {
        if !diag::assert_true(delay_secs.is_finite(), "auto-return delay must be finite") {
            return;
        }
        self.timers.insert(id, delay_secs.max(0.0));
    }

    /// Cancels the timer for `id`. Returns whether one was running.
    pub fn disarm(&mut self, id: InstanceId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Seconds left before `id` is released.
    #[must_use]
    pub fn remaining(&self, id: InstanceId) -> Option<f32> {
        self.timers.get(&id).copied()
    }

    /// Number of running timers.
    #[inline]
    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// Advances every timer by `dt` seconds and releases the expired ones.
    ///
    /// Expired instances are released in spawn order. Returns how many were
    /// actually returned to a pool.
    ///
    /// A non-finite `dt` is logged and skipped, leaving every timer as it
    /// was. A negative `dt` counts as zero.
    pub fn tick<P: Prefab>(&mut self, dt: f32, pools: &mut PoolManager<P>) -> usize {
        if !diag::assert_true(dt.is_finite(), "auto-return frame time must be finite") {
            return 0;
        }
        let dt = dt.max(0.0);

        let mut expired = Vec::new();
        self.timers.retain(|id, remaining| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                expired.push(*id);
                false
            } else {
                true
            }
        });
        expired.sort_unstable();

        let mut released = 0;
        for id in expired {
            if pools.release_object(id) {
                released += 1;
            } else {
                tracing::debug!(
                    instance = id.raw(),
                    "auto-return fired for an instance already back in its pool"
                );
            }
        }
        released
    }
}

impl Default for AutoReturn {
    fn default() -> Self {
        Self::new(&AutoReturnConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::manager::tests::TestPrefab;

    const SPARK: TestPrefab = TestPrefab("spark");

    fn scheduler(delay_secs: f32) -> AutoReturn {
        AutoReturn::new(&AutoReturnConfig { delay_secs })
    }

    #[test]
    fn test_releases_after_delay() {
        let mut pools = PoolManager::default();
        let mut auto = scheduler(1.0);

        let id = pools.spawn(&SPARK);
        auto.arm(id);

        assert_eq!(auto.tick(0.5, &mut pools), 0);
        assert!(pools.is_spawned(id));

        assert_eq!(auto.tick(0.5, &mut pools), 1);
        assert!(!pools.is_spawned(id));
        assert_eq!(auto.armed_count(), 0);
    }

    #[test]
    fn test_rearm_restarts_timer() {
        let mut pools = PoolManager::default();
        let mut auto = scheduler(1.0);

        let id = pools.spawn(&SPARK);
        auto.arm(id);
        auto.tick(0.8, &mut pools);
        auto.arm(id);

        assert_eq!(auto.tick(0.8, &mut pools), 0);
        assert!(pools.is_spawned(id));
        assert_eq!(auto.tick(0.3, &mut pools), 1);
    }

    #[test]
    fn test_already_released_is_harmless() {
        let mut pools = PoolManager::default();
        let mut auto = scheduler(0.1);

        let id = pools.spawn(&SPARK);
        auto.arm(id);
        pools.release_object(id);

        assert_eq!(auto.tick(1.0, &mut pools), 0);
        assert_eq!(pools.pool_status(&SPARK).unwrap().in_use, 0);
    }

    #[test]
    fn test_disarm_and_custom_delay() {
        let mut pools = PoolManager::default();
        let mut auto = scheduler(5.0);

        let a = pools.spawn(&SPARK);
        let b = pools.spawn(&SPARK);
        auto.arm(a);
        auto.arm_for(b, 0.25);

        assert!(auto.disarm(a));
        assert!(!auto.disarm(a));
        assert_eq!(auto.remaining(b), Some(0.25));

        assert_eq!(auto.tick(10.0, &mut pools), 1);
        assert!(pools.is_spawned(a));
        assert!(!pools.is_spawned(b));
    }

    #[test]
    fn test_non_finite_delay_is_ignored() {
        let mut pools = PoolManager::default();
        let mut auto = scheduler(1.0);

        let id = pools.spawn(&SPARK);
        auto.arm_for(id, f32::NAN);

        assert_eq!(auto.remaining(id), None);
        assert_eq!(auto.tick(10.0, &mut pools), 0);
        assert!(pools.is_spawned(id));
    }

    #[test]
    fn test_non_finite_frame_time_keeps_timers_running() {
        let mut pools = PoolManager::default();
        let mut auto = scheduler(0.1);

        let id = pools.spawn(&SPARK);
        auto.arm(id);

        assert_eq!(auto.tick(f32::NAN, &mut pools), 0);
        assert_eq!(auto.tick(f32::INFINITY, &mut pools), 0);
        assert_eq!(auto.tick(-5.0, &mut pools), 0);
        assert_eq!(auto.remaining(id), Some(0.1));

        assert_eq!(auto.tick(1.0, &mut pools), 1);
        assert!(!pools.is_spawned(id));
    }
}
