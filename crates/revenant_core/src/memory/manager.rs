//! # Pool Manager
//!
//! One [`Pool`] per prefab, plus a lease table that routes `release_object`
//! back to the right pool without the caller naming it.
//!
//! ```text
//!   spawn_object(prefab) ──> prefab_lookup[prefab] ──> Pool::acquire ──> slot
//!                                                                         │
//!   InstanceId <── instance_lookup[id] = (prefab, slot) <─────────────────┘
//!
//!   release_object(id) ──> instance_lookup.remove(id) ──> Pool::release(slot)
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use revenant_shared::{diag, Quaternion, Vec3, DEFAULT_LAZY_WARM_SIZE, PARKING_POSITION};

use super::config::PoolManagerConfig;
use super::pool::{Pool, PoolSlot, Poolable};
use crate::error::{PoolError, PoolResult};

/// A template that pooled instances are stamped from.
///
/// The prefab value itself is the pool key, so it should be cheap to clone
/// (a handle, an id, an `Rc`).
pub trait Prefab: Clone + Eq + Hash + fmt::Debug + 'static {
    /// The object type this prefab produces.
    type Instance: Poolable + 'static;

    /// Human-readable name; also names the pool's container.
    fn name(&self) -> &str;

    /// Builds one fresh instance.
    fn instantiate(&self) -> Self::Instance;
}

/// Identity of one spawn.
///
/// A new id is minted on every spawn, so an id kept after release never
/// aliases a later spawn that happens to reuse the same pooled object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance#{}", self.0)
    }
}

/// Usage snapshot of one pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolStatus {
    /// Prefab name.
    pub template: String,
    /// Instances currently spawned.
    pub in_use: usize,
    /// Instances ever created.
    pub total: usize,
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Object pool for prefab {}: in use {} total {}",
            self.template, self.in_use, self.total
        )
    }
}

/// Where a spawned instance came from.
#[derive(Debug)]
struct Lease<P> {
    prefab: P,
    slot: PoolSlot,
}

/// Owns every pool and tracks which spawned instance belongs to which.
///
/// Invariant: an id is in `instance_lookup` iff it is spawned and not yet
/// released.
pub struct PoolManager<P: Prefab> {
    config: PoolManagerConfig,
    prefab_lookup: HashMap<P, Pool<P::Instance>>,
    instance_lookup: HashMap<InstanceId, Lease<P>>,
    next_instance: u64,
    /// Set by every warm/spawn/release, cleared by `update`.
    dirty: bool,
}

impl<P: Prefab> PoolManager<P> {
    /// Creates a manager with no pools.
    #[must_use]
    pub fn new(config: PoolManagerConfig) -> Self {
        Self {
            config,
            prefab_lookup: HashMap::new(),
            instance_lookup: HashMap::new(),
            next_instance: 0,
            dirty: false,
        }
    }

    /// Creates a manager and warms one pool of `config.init_size` per prefab.
    ///
    /// # Errors
    ///
    /// [`PoolError::AlreadyWarmed`] if `prefabs` lists the same prefab twice.
    pub fn with_prefabs(
        config: PoolManagerConfig,
        prefabs: impl IntoIterator<Item = P>,
    ) -> PoolResult<Self> {
        let init_size = config.init_size;
        let mut manager = Self::new(config);
        for prefab in prefabs {
            manager.warm_pool(prefab, init_size)?;
        }
        Ok(manager)
    }

    /// Declares a pool for `prefab` and pre-creates `size` parked instances.
    ///
    /// # Errors
    ///
    /// [`PoolError::AlreadyWarmed`] if the prefab already has a pool. The
    /// existing pool is left untouched.
    pub fn warm_pool(&mut self, prefab: P, size: usize) -> PoolResult<()> {
        match self.prefab_lookup.entry(prefab) {
            Entry::Occupied(e) => Err(PoolError::AlreadyWarmed {
                template: e.key().name().to_owned(),
            }),
            Entry::Vacant(e) => {
                tracing::debug!(template = e.key().name(), size, "pool warmed");
                let pool = Self::build_pool(e.key(), size);
                e.insert(pool);
                self.dirty = true;
                Ok(())
            }
        }
    }

    /// Spawns at the origin with no rotation.
    pub fn spawn(&mut self, prefab: &P) -> InstanceId {
        self.spawn_object(prefab, Vec3::ZERO, Quaternion::IDENTITY)
    }

    /// Takes an instance of `prefab`, places it and activates it.
    ///
    /// A prefab that was never warmed gets a pool of
    /// [`DEFAULT_LAZY_WARM_SIZE`] on the spot.
    pub fn spawn_object(&mut self, prefab: &P, position: Vec3, rotation: Quaternion) -> InstanceId {
        let pool = match self.prefab_lookup.entry(prefab.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                tracing::warn!(
                    template = prefab.name(),
                    size = DEFAULT_LAZY_WARM_SIZE,
                    "spawning unwarmed prefab, creating pool lazily"
                );
                e.insert(Self::build_pool(prefab, DEFAULT_LAZY_WARM_SIZE))
            }
        };

        let slot = pool.acquire();
        if let Some(item) = pool.get_mut(slot) {
            item.set_transform(position, rotation);
            item.set_active(true);
        }

        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        self.instance_lookup.insert(
            id,
            Lease {
                prefab: prefab.clone(),
                slot,
            },
        );
        self.dirty = true;
        id
    }

    /// Returns a spawned instance to its pool.
    ///
    /// Unknown ids (never spawned here, or already released) are logged and
    /// ignored. Returns whether anything was released.
    pub fn release_object(&mut self, id: InstanceId) -> bool {
        let Some(lease) = self.instance_lookup.remove(&id) else {
            diag::warn(&format!("no pool contains the object {id}"));
            return false;
        };
        if let Some(pool) = self.prefab_lookup.get_mut(&lease.prefab) {
            pool.release(lease.slot);
        }
        self.dirty = true;
        true
    }

    /// The spawned instance behind `id`, if it is still out.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&P::Instance> {
        let lease = self.instance_lookup.get(&id)?;
        self.prefab_lookup.get(&lease.prefab)?.get(lease.slot)
    }

    /// Mutable access to the spawned instance behind `id`.
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut P::Instance> {
        let lease = self.instance_lookup.get(&id)?;
        self.prefab_lookup.get_mut(&lease.prefab)?.get_mut(lease.slot)
    }

    /// Whether `id` is currently spawned.
    #[inline]
    #[must_use]
    pub fn is_spawned(&self, id: InstanceId) -> bool {
        self.instance_lookup.contains_key(&id)
    }

    /// Number of instances currently spawned across all pools.
    #[inline]
    #[must_use]
    pub fn spawned_count(&self) -> usize {
        self.instance_lookup.len()
    }

    /// Whether `prefab` has a pool.
    #[inline]
    #[must_use]
    pub fn has_pool(&self, prefab: &P) -> bool {
        self.prefab_lookup.contains_key(prefab)
    }

    /// Usage of the pool for `prefab`.
    #[must_use]
    pub fn pool_status(&self, prefab: &P) -> Option<PoolStatus> {
        self.prefab_lookup
            .get(prefab)
            .map(|pool| Self::status_of(prefab, pool))
    }

    /// Logs and returns the usage of every pool, sorted by prefab name.
    pub fn print_status(&self) -> Vec<PoolStatus> {
        let mut report: Vec<PoolStatus> = self
            .prefab_lookup
            .iter()
            .map(|(prefab, pool)| Self::status_of(prefab, pool))
            .collect();
        report.sort_by(|a, b| a.template.cmp(&b.template));

        for status in &report {
            tracing::info!("{status}");
        }
        report
    }

    /// Per-frame hook: reports status once after any change, if enabled.
    ///
    /// Returns `true` when a report was printed.
    pub fn update(&mut self) -> bool {
        if self.config.log_status && self.dirty {
            self.print_status();
            self.dirty = false;
            return true;
        }
        false
    }

    /// Whether a warm/spawn/release happened since the last report.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The manager's configuration.
    #[must_use]
    pub fn config(&self) -> &PoolManagerConfig {
        &self.config
    }

    fn build_pool(prefab: &P, size: usize) -> Pool<P::Instance> {
        let source = prefab.clone();
        let container = prefab.name().to_owned();
        Pool::new(move || park(source.instantiate(), &container), size)
    }

    fn status_of(prefab: &P, pool: &Pool<P::Instance>) -> PoolStatus {
        PoolStatus {
            template: prefab.name().to_owned(),
            in_use: pool.used_count(),
            total: pool.count(),
        }
    }
}

impl<P: Prefab> Default for PoolManager<P> {
    fn default() -> Self {
        Self::new(PoolManagerConfig::default())
    }
}

impl<P: Prefab> fmt::Debug for PoolManager<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolManager")
            .field("pools", &self.prefab_lookup.len())
            .field("spawned", &self.instance_lookup.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

/// Puts a fresh instance in its idle state: out of view, inactive, grouped.
fn park<T: Poolable>(mut item: T, container: &str) -> T {
    item.set_transform(PARKING_POSITION, Quaternion::IDENTITY);
    item.set_active(false);
    item.set_container(container);
    item
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::memory::pool::tests::Dummy;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub(crate) struct TestPrefab(pub(crate) &'static str);

    impl Prefab for TestPrefab {
        type Instance = Dummy;

        fn name(&self) -> &str {
            self.0
        }

        fn instantiate(&self) -> Dummy {
            Dummy {
                active: true,
                ..Dummy::default()
            }
        }
    }

    const BULLET: TestPrefab = TestPrefab("bullet");
    const ENEMY: TestPrefab = TestPrefab("enemy");

    #[test]
    fn test_warm_once() {
        let mut pools = PoolManager::default();
        pools.warm_pool(BULLET, 3).unwrap();

        let err = pools.warm_pool(BULLET, 10).unwrap_err();
        assert_eq!(
            err,
            PoolError::AlreadyWarmed {
                template: "bullet".into()
            }
        );

        let status = pools.pool_status(&BULLET).unwrap();
        assert_eq!(status.total, 3);
        assert_eq!(status.in_use, 0);
    }

    #[test]
    fn test_warmed_instances_are_parked() {
        let mut pools = PoolManager::default();
        pools.warm_pool(BULLET, 1).unwrap();

        // The prefab builds active instances; the pool must hand them out parked.
        let pool = pools.prefab_lookup.get(&BULLET).unwrap();
        let idle = pool.get(PoolSlot(0)).unwrap();
        assert!(!idle.active);
        assert_eq!(idle.position, PARKING_POSITION);
        assert_eq!(idle.container, "bullet");
    }

    #[test]
    fn test_spawn_places_and_activates() {
        let mut pools = PoolManager::default();
        pools.warm_pool(ENEMY, 2).unwrap();

        let rotation = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let id = pools.spawn_object(&ENEMY, Vec3::new(1.0, 2.0, 3.0), rotation);

        let enemy = pools.get(id).unwrap();
        assert!(enemy.is_active());
        assert_eq!(enemy.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(enemy.rotation, rotation);
        assert_eq!(enemy.container, "enemy");
        assert_eq!(pools.pool_status(&ENEMY).unwrap().in_use, 1);
    }

    #[test]
    fn test_lazy_warm_on_spawn() {
        let mut pools = PoolManager::default();
        assert!(!pools.has_pool(&BULLET));

        let id = pools.spawn(&BULLET);
        assert!(pools.has_pool(&BULLET));
        assert_eq!(pools.pool_status(&BULLET).unwrap().total, DEFAULT_LAZY_WARM_SIZE);

        assert!(pools.release_object(id));
        assert_eq!(pools.pool_status(&BULLET).unwrap().in_use, 0);
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut pools = PoolManager::default();
        pools.warm_pool(BULLET, 1).unwrap();

        let id = pools.spawn(&BULLET);
        assert!(pools.release_object(id));
        assert!(!pools.release_object(id));

        let status = pools.pool_status(&BULLET).unwrap();
        assert_eq!(status.in_use, 0);
        assert_eq!(status.total, 1);

        // The pool still hands out exactly one instance before growing.
        let a = pools.spawn(&BULLET);
        let b = pools.spawn(&BULLET);
        assert_ne!(a, b);
        assert_eq!(pools.pool_status(&BULLET).unwrap().total, 2);
    }

    #[test]
    fn test_stale_id_does_not_release_new_spawn() {
        let mut pools = PoolManager::default();
        pools.warm_pool(BULLET, 1).unwrap();

        let first = pools.spawn(&BULLET);
        pools.release_object(first);
        let second = pools.spawn(&BULLET); // same pooled object, new id

        assert!(!pools.release_object(first));
        assert!(pools.is_spawned(second));
        assert!(pools.get(second).unwrap().is_active());
    }

    #[test]
    fn test_release_deactivates() {
        let mut pools = PoolManager::default();
        let id = pools.spawn(&ENEMY);
        pools.get_mut(id).unwrap().set_active(true);

        pools.release_object(id);
        assert!(pools.get(id).is_none());
        assert_eq!(pools.spawned_count(), 0);
    }

    #[test]
    fn test_with_prefabs_rejects_duplicates() {
        let config = PoolManagerConfig {
            log_status: false,
            init_size: 2,
        };
        let pools = PoolManager::with_prefabs(config.clone(), [BULLET, ENEMY]).unwrap();
        assert_eq!(pools.pool_status(&ENEMY).unwrap().total, 2);

        assert!(PoolManager::with_prefabs(config, [BULLET, BULLET]).is_err());
    }

    #[test]
    fn test_update_reports_only_when_dirty() {
        let config = PoolManagerConfig {
            log_status: true,
            init_size: 1,
        };
        let mut pools = PoolManager::with_prefabs(config, [BULLET]).unwrap();

        assert!(pools.update());
        assert!(!pools.update());

        let id = pools.spawn(&BULLET);
        assert!(pools.update());
        pools.release_object(id);
        assert!(pools.is_dirty());
        assert!(pools.update());
        assert!(!pools.is_dirty());
    }

    #[test]
    fn test_print_status_sorted() {
        let mut pools = PoolManager::default();
        pools.warm_pool(ENEMY, 1).unwrap();
        pools.warm_pool(BULLET, 4).unwrap();
        let _ = pools.spawn(&BULLET);

        let report = pools.print_status();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].to_string(), "Object pool for prefab bullet: in use 1 total 4");
        assert_eq!(report[1].template, "enemy");
    }
}
