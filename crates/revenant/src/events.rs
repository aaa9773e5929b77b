//! # Event Dispatcher
//!
//! Synchronous publish/subscribe keyed by [`EventId`].
//!
//! ```text
//!   post_event(EnemyDie, sender, payload)
//!        │
//!        ▼
//!   listeners[EnemyDie] = [ L1, L2, L3 ]      (registration order)
//!        │   snapshot ids, re-check each one before calling
//!        ├──> L1(sender, payload)
//!        ├──> L2(sender, payload)  panics ──> logged, L2 evicted
//!        └──> L3(sender, payload)
//! ```
//!
//! Listeners run on the caller's stack. A listener may post, register or
//! unregister from inside its callback: no internal borrow is held while a
//! callback runs.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use revenant_shared::{diag, EventId};

/// What a stored callback reports back to the dispatch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Delivery {
    Delivered,
    /// The listener's owner was dropped; nothing was called.
    OwnerGone,
}

type Callback = Rc<dyn Fn(&dyn Any, Option<&dyn Any>) -> Delivery>;

/// Handle returned by registration, used to unregister.
///
/// Every registration gets its own id, so the same closure registered twice
/// is two listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Outcome of one [`EventDispatcher::post_event`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Listeners that ran to completion.
    pub delivered: usize,
    /// Listeners that panicked and were evicted.
    pub faulted: usize,
    /// Listeners whose owner was gone; evicted without being called.
    pub stale: usize,
}

struct Subscriber {
    id: ListenerId,
    /// `None` for free-standing listeners, which are always valid.
    owner: Option<Weak<dyn Any>>,
    callback: Callback,
}

impl Subscriber {
    fn is_valid(&self) -> bool {
        self.owner
            .as_ref()
            .map_or(true, |owner| owner.strong_count() > 0)
    }

    fn is_owned_by(&self, owner: *const ()) -> bool {
        self.owner
            .as_ref()
            .is_some_and(|weak| weak.as_ptr().cast::<()>() == owner)
    }
}

/// Routes events to the listeners registered for them.
///
/// # Thread Safety
///
/// Single-threaded by construction (`!Send`): the dispatcher lives on the
/// frame thread and uses interior mutability only to allow re-entrant calls.
pub struct EventDispatcher {
    listeners: RefCell<HashMap<EventId, Vec<Subscriber>>>,
    next_id: Cell<u64>,
    /// Bumped on every unregistration; lets a dispatch pass skip the
    /// membership check while nothing has been removed.
    removals: Cell<u64>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            removals: Cell::new(0),
        }
    }

    /// Registers a free-standing listener for `event`.
    ///
    /// The callback receives the sender and the optional payload; both are
    /// type-erased, use `downcast_ref` to read them.
    pub fn register_listener<F>(&self, event: EventId, callback: F) -> ListenerId
    where
        F: Fn(&dyn Any, Option<&dyn Any>) + 'static,
    {
        let callback: Callback = Rc::new(move |sender: &dyn Any, payload: Option<&dyn Any>| {
            callback(sender, payload);
            Delivery::Delivered
        });
        self.push(event, None, callback)
    }

    /// Registers a listener bound to `owner`.
    ///
    /// Only a weak reference to the owner is kept. Once the owner is
    /// dropped the callback is never called again, and the entry is
    /// reclaimed by the next dispatch of `event` or by
    /// [`remove_redundancies`](Self::remove_redundancies).
    pub fn register_owned<O, F>(&self, event: EventId, owner: &Rc<O>, callback: F) -> ListenerId
    where
        O: 'static,
        F: Fn(&O, &dyn Any, Option<&dyn Any>) + 'static,
    {
        let target = Rc::downgrade(owner);
        let erased: Rc<dyn Any> = Rc::<O>::clone(owner);
        let weak_owner = Rc::downgrade(&erased);

        let callback: Callback = Rc::new(move |sender: &dyn Any, payload: Option<&dyn Any>| {
            match target.upgrade() {
                Some(owner) => {
                    callback(&*owner, sender, payload);
                    Delivery::Delivered
                }
                None => Delivery::OwnerGone,
            }
        });
        self.push(event, Some(weak_owner), callback)
    }

    /// Posts `event` without a payload.
    pub fn post(&self, event: EventId, sender: &dyn Any) -> DispatchReport {
        self.post_event(event, sender, None)
    }

    /// Posts `event` with a typed payload.
    pub fn post_with<T: Any>(&self, event: EventId, sender: &dyn Any, payload: &T) -> DispatchReport {
        self.post_event(event, sender, Some(payload as &dyn Any))
    }

    /// Calls every listener of `event`, in registration order.
    ///
    /// A listener that panics is logged and evicted for good, then delivery
    /// continues with the next one. Listeners unregistered by an earlier
    /// callback in the same pass are skipped; listeners registered during
    /// the pass are first called by the next post.
    ///
    /// An event without listeners is logged and otherwise ignored.
    pub fn post_event(&self, event: EventId, sender: &dyn Any, payload: Option<&dyn Any>) -> DispatchReport {
        let snapshot: Vec<(ListenerId, Callback)> = match self.listeners.borrow().get(&event) {
            Some(list) => list
                .iter()
                .map(|sub| (sub.id, Rc::clone(&sub.callback)))
                .collect(),
            None => {
                diag::warn(&format!("no listener for event {event}"));
                return DispatchReport::default();
            }
        };

        let mut report = DispatchReport::default();
        let mut seen = self.removals.get();
        let mut live: Option<HashSet<ListenerId>> = None;
        for (id, callback) in snapshot {
            if self.removals.get() != seen {
                seen = self.removals.get();
                live = Some(self.live_ids(event));
            }
            if live.as_ref().is_some_and(|ids| !ids.contains(&id)) {
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(|| callback(sender, payload))) {
                Ok(Delivery::Delivered) => report.delivered += 1,
                Ok(Delivery::OwnerGone) => {
                    tracing::debug!(
                        event = event.name(),
                        listener = id.0,
                        "listener owner dropped, evicting"
                    );
                    self.evict_current(event, id, &mut seen);
                    report.stale += 1;
                }
                Err(cause) => {
                    tracing::warn!(
                        event = event.name(),
                        listener = id.0,
                        "error while posting event, evicting listener: {}",
                        diag::panic_message(&*cause)
                    );
                    self.evict_current(event, id, &mut seen);
                    report.faulted += 1;
                }
            }
        }
        report
    }

    /// Unregisters one listener.
    ///
    /// Returns `false` if it was not registered. Removing from an event that
    /// has no listeners at all is logged.
    pub fn remove_listener(&self, event: EventId, id: ListenerId) -> bool {
        if !self.has_listeners(event) {
            diag::warn(&format!("no listener for event {event}"));
            return false;
        }
        self.take(event, id).is_some()
    }

    /// Unregisters every listener bound to `owner`, on every event.
    pub fn remove_listeners_for<O: 'static>(&self, owner: &Rc<O>) -> usize {
        let target = Rc::as_ptr(owner).cast::<()>();
        self.drain_where(|sub| sub.is_owned_by(target)).len()
    }

    /// Drops every listener whose owner no longer exists.
    ///
    /// Listeners of other events, and free-standing listeners, are left
    /// alone. Safe to call at any cadence.
    pub fn remove_redundancies(&self) -> usize {
        let removed = self.drain_where(|sub| !sub.is_valid()).len();
        if removed > 0 {
            tracing::debug!(removed, "stale listeners swept");
        }
        removed
    }

    /// Drops every listener of every event.
    pub fn clear_all_listeners(&self) {
        let cleared = std::mem::take(&mut *self.listeners.borrow_mut());
        self.bump_removals();
        drop(cleared);
    }

    /// Number of listeners registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: EventId) -> usize {
        self.listeners.borrow().get(&event).map_or(0, Vec::len)
    }

    /// Whether `event` has at least one listener.
    #[must_use]
    pub fn has_listeners(&self, event: EventId) -> bool {
        self.listeners.borrow().contains_key(&event)
    }

    /// Whether no event has any listener.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    fn push(&self, event: EventId, owner: Option<Weak<dyn Any>>, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.listeners
            .borrow_mut()
            .entry(event)
            .or_default()
            .push(Subscriber { id, owner, callback });

        tracing::trace!(event = event.name(), listener = id.0, "listener registered");
        id
    }

    fn live_ids(&self, event: EventId) -> HashSet<ListenerId> {
        self.listeners
            .borrow()
            .get(&event)
            .map(|list| list.iter().map(|sub| sub.id).collect())
            .unwrap_or_default()
    }

    /// Evicts the listener the dispatch loop is on. Its own removal does
    /// not invalidate the pass; removals made by its `Drop` do.
    fn evict_current(&self, event: EventId, id: ListenerId, seen: &mut u64) {
        let before = self.removals.get();
        let removed = self.take(event, id);
        if *seen == before {
            *seen = self.removals.get();
        }
        drop(removed);
    }

    /// Removes one listener; an emptied event entry is dropped too.
    ///
    /// The subscriber is handed back so the caller drops it after the
    /// borrow ends: its captures may call back into the dispatcher.
    fn take(&self, event: EventId, id: ListenerId) -> Option<Subscriber> {
        let mut listeners = self.listeners.borrow_mut();
        let list = listeners.get_mut(&event)?;
        let index = list.iter().position(|sub| sub.id == id)?;
        let removed = list.remove(index);
        if list.is_empty() {
            listeners.remove(&event);
        }
        self.bump_removals();
        Some(removed)
    }

    fn drain_where(&self, predicate: impl Fn(&Subscriber) -> bool) -> Vec<Subscriber> {
        let mut listeners = self.listeners.borrow_mut();
        let mut removed = Vec::new();
        for list in listeners.values_mut() {
            let (gone, kept): (Vec<_>, Vec<_>) =
                std::mem::take(list).into_iter().partition(|sub| predicate(sub));
            *list = kept;
            removed.extend(gone);
        }
        listeners.retain(|_, list| !list.is_empty());
        if !removed.is_empty() {
            self.bump_removals();
        }
        removed
    }

    fn bump_removals(&self) {
        self.removals.set(self.removals.get().wrapping_add(1));
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        f.debug_struct("EventDispatcher")
            .field("events", &listeners.len())
            .field("listeners", &listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}
