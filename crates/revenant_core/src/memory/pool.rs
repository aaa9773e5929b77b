//! # Object Pool
//!
//! Grow-on-demand recycling container for one kind of object.

use std::fmt;

use revenant_shared::{diag, Quaternion, Vec3};

/// An object that can live in a [`Pool`].
///
/// The pool toggles activity and the manager places the object; everything
/// else about the object is opaque to both.
pub trait Poolable {
    /// Shows/enables (`true`) or hides/disables (`false`) the object.
    fn set_active(&mut self, active: bool);

    /// Whether the object is currently active.
    fn is_active(&self) -> bool;

    /// Moves the object.
    fn set_transform(&mut self, position: Vec3, rotation: Quaternion);

    /// Attaches the object to the named container that groups a pool's
    /// instances. Objects without a hierarchy can ignore it.
    fn set_container(&mut self, _container: &str) {}
}

/// Index of an instance inside its [`Pool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolSlot(pub(crate) usize);

impl PoolSlot {
    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A recycling pool for objects of type `T`.
///
/// Instances are created by `factory` either up front (warm-up) or when the
/// free list runs dry, and are never destroyed: the total only grows.
/// Free slots are reused last-released-first.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is driven from the frame loop only.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool = Pool::new(|| Bullet::parked(), 16);
///
/// let slot = pool.acquire();      // no allocation while warm
/// pool.get_mut(slot).unwrap().set_active(true);
/// pool.release(slot);             // deactivated, back on the free list
/// ```
pub struct Pool<T> {
    /// Creates one new, inactive instance.
    factory: Box<dyn FnMut() -> T>,
    /// Every instance ever created, indexed by slot.
    items: Vec<T>,
    /// Slots available for `acquire`.
    free_list: Vec<PoolSlot>,
    /// Per-slot flag, `true` while the slot sits on the free list.
    idle: Vec<bool>,
}

impl<T: Poolable> Pool<T> {
    /// Creates a pool and pre-populates it with `initial` instances.
    #[must_use]
    pub fn new(factory: impl FnMut() -> T + 'static, initial: usize) -> Self {
        let mut pool = Self {
            factory: Box::new(factory),
            items: Vec::with_capacity(initial),
            free_list: Vec::with_capacity(initial),
            idle: Vec::with_capacity(initial),
        };
        pool.warm(initial);
        pool
    }

    /// Creates `count` extra instances and marks them free.
    pub fn warm(&mut self, count: usize) {
        for _ in 0..count {
            let slot = self.create();
            self.idle[slot.0] = true;
            self.free_list.push(slot);
        }
    }

    /// Takes a free instance, creating one if none is left.
    ///
    /// The instance is returned in whatever state the factory or the last
    /// `release` left it (inactive); activating it is the caller's job.
    pub fn acquire(&mut self) -> PoolSlot {
        match self.free_list.pop() {
            Some(slot) => {
                self.idle[slot.0] = false;
                slot
            }
            None => self.create(),
        }
    }

    /// Deactivates the instance and puts it back on the free list.
    ///
    /// Releasing a slot that is already free is a caller error: it is
    /// logged and ignored, so the slot is never handed out twice.
    pub fn release(&mut self, slot: PoolSlot) {
        let Some(item) = self.items.get_mut(slot.0) else {
            diag::warn(&format!(
                "release of slot {} outside pool of {}",
                slot.0,
                self.items.len()
            ));
            return;
        };
        if self.idle[slot.0] {
            diag::warn(&format!("slot {} released twice", slot.0));
            return;
        }
        item.set_active(false);
        self.idle[slot.0] = true;
        self.free_list.push(slot);
    }

    fn create(&mut self) -> PoolSlot {
        let slot = PoolSlot(self.items.len());
        self.items.push((self.factory)());
        self.idle.push(false);
        slot
    }
}

impl<T> Pool<T> {
    /// Gets a reference to a pooled instance.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: PoolSlot) -> Option<&T> {
        self.items.get(slot.0)
    }

    /// Gets a mutable reference to a pooled instance.
    #[inline]
    pub fn get_mut(&mut self, slot: PoolSlot) -> Option<&mut T> {
        self.items.get_mut(slot.0)
    }

    /// Total number of instances created so far.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Number of instances waiting on the free list.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Number of instances currently handed out.
    #[inline]
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.items.len().saturating_sub(self.free_list.len())
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("count", &self.count())
            .field("free", &self.free_count())
            .finish_non_exhaustive()
    }
}
