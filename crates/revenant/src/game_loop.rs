//! # Frame Driver
//!
//! Runs the per-frame housekeeping of the pool and event services:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. AUTO-RETURN                                                      │
//! │    └─ Advance timers by dt, release expired instances               │
//! │                                                                     │
//! │ 2. POOL STATUS                                                      │
//! │    └─ Log pool usage if anything changed (log_status only)          │
//! │                                                                     │
//! │ 3. LISTENER SWEEP (every sweep_interval_frames)                     │
//! │    └─ Drop listeners whose owner is gone                            │
//! │                                                                     │
//! │ 4. END FRAME                                                        │
//! │    └─ Run end-of-frame hooks                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//! Game logic runs between ticks and talks to the services directly.

use std::cell::RefCell;
use std::rc::Rc;

use revenant_core::{AutoReturn, InstanceId, PoolManager, Prefab};
use revenant_shared::{diag, Quaternion, Vec3};

use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::events::EventDispatcher;
use crate::services;
use crate::signal::{Signal, SignalHandle};

/// Pool manager shared between the frame driver and game code.
pub type SharedPools<P> = Rc<RefCell<PoolManager<P>>>;

/// What one [`GameLoop::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number (0-based).
    pub frame: u64,
    /// Instances released by auto-return.
    pub auto_returned: usize,
    /// Whether pool status was logged.
    pub status_reported: bool,
    /// Stale listeners swept.
    pub swept: usize,
}

/// Owns the pool manager, the dispatcher and the auto-return timers.
pub struct GameLoop<P: Prefab> {
    pools: SharedPools<P>,
    dispatcher: Rc<EventDispatcher>,
    auto_return: AutoReturn,
    config: RuntimeConfig,
    frame_end: Signal,
    frame_count: u64,
    /// Frame time not yet applied to the auto-return timers.
    pending_dt: f32,
}

impl<P: Prefab> GameLoop<P> {
    /// Creates the services and warms one pool per listed prefab.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or a prefab is listed twice.
    pub fn new(config: RuntimeConfig, prefabs: impl IntoIterator<Item = P>) -> RuntimeResult<Self> {
        config.validate()?;
        let pools = PoolManager::with_prefabs(config.pools.clone(), prefabs)?;
        let auto_return = AutoReturn::new(&config.auto_return);

        Ok(Self {
            pools: Rc::new(RefCell::new(pools)),
            dispatcher: Rc::new(EventDispatcher::new()),
            auto_return,
            config,
            frame_end: Signal::new(),
            frame_count: 0,
            pending_dt: 0.0,
        })
    }

    /// Publishes the pool manager and dispatcher through [`services`].
    ///
    /// # Errors
    ///
    /// Fails if either service is already installed on this thread; nothing
    /// is installed in that case.
    pub fn install_services(&self) -> RuntimeResult<()> {
        if services::is_installed::<EventDispatcher>() {
            return Err(RuntimeError::ServiceAlreadyInstalled(
                std::any::type_name::<EventDispatcher>(),
            ));
        }
        services::install(Rc::clone(&self.pools))?;
        services::install(Rc::clone(&self.dispatcher))
    }

    /// Removes what [`install_services`](Self::install_services) published.
    pub fn uninstall_services(&self) {
        services::teardown::<RefCell<PoolManager<P>>>();
        services::teardown::<EventDispatcher>();
    }

    /// The shared pool manager.
    #[must_use]
    pub fn pools(&self) -> &SharedPools<P> {
        &self.pools
    }

    /// The dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Rc<EventDispatcher> {
        &self.dispatcher
    }

    /// Auto-return timers, for arming and disarming.
    pub fn auto_return_mut(&mut self) -> &mut AutoReturn {
        &mut self.auto_return
    }

    /// Spawns an instance that returns to its pool after the configured delay.
    pub fn spawn_timed(&mut self, prefab: &P, position: Vec3, rotation: Quaternion) -> InstanceId {
        let id = self.pools.borrow_mut().spawn_object(prefab, position, rotation);
        self.auto_return.arm(id);
        id
    }

    /// Adds an end-of-frame hook.
    pub fn on_frame_end(&mut self, hook: impl FnMut() + 'static) -> SignalHandle {
        self.frame_end.add(hook)
    }

    /// Removes an end-of-frame hook.
    pub fn remove_frame_end(&mut self, handle: SignalHandle) -> bool {
        self.frame_end.remove(handle)
    }

    /// Runs one frame of housekeeping. `dt` is the frame time in seconds.
    ///
    /// If the pool manager is still borrowed by game code, auto-return and
    /// status reporting are skipped for this frame; timers resume on the
    /// next tick without losing the skipped time.
    pub fn tick(&mut self, dt: f32) -> FrameStats {
        let dt = dt.max(0.0);

        let (auto_returned, status_reported) = match self.pools.try_borrow_mut() {
            Ok(mut pools) => {
                let pending = self.pending_dt + dt;
                self.pending_dt = 0.0;
                let released = self.auto_return.tick(pending, &mut pools);
                (released, pools.update())
            }
            Err(_) => {
                diag::warn("pool manager borrowed during tick, skipping pool housekeeping");
                self.pending_dt += dt;
                (0, false)
            }
        };

        let interval = self.config.dispatcher.sweep_interval_frames;
        let swept = if interval > 0 && (self.frame_count + 1) % interval == 0 {
            self.dispatcher.remove_redundancies()
        } else {
            0
        };

        self.frame_end.run();

        let stats = FrameStats {
            frame: self.frame_count,
            auto_returned,
            status_reported,
            swept,
        };
        self.frame_count += 1;
        stats
    }

    /// Frames ticked so far.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The runtime configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}
