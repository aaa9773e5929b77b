//! Process-wide service accessor.
//!
//! Services are installed explicitly at startup and torn down explicitly at
//! shutdown; nothing is created lazily behind the caller's back. The
//! registry is keyed by type and lives in a thread-local, because every
//! service it holds is frame-thread only.
//!
//! ```rust,ignore
//! services::install(Rc::new(EventDispatcher::new()))?;
//! // ... anywhere on the frame thread:
//! services::dispatcher()?.post(EventId::GameOver, &hud);
//! // ... at shutdown / test teardown:
//! services::teardown_all();
//! ```

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use revenant_core::{PoolManager, Prefab};

use crate::error::{RuntimeError, RuntimeResult};
use crate::events::EventDispatcher;
use crate::game_loop::SharedPools;

thread_local! {
    static SERVICES: RefCell<HashMap<TypeId, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Installs `service` as the instance of `T` for this thread.
///
/// # Errors
///
/// [`RuntimeError::ServiceAlreadyInstalled`] if a `T` is already installed;
/// the existing one stays in place.
pub fn install<T: 'static>(service: Rc<T>) -> RuntimeResult<()> {
    SERVICES.with(|services| {
        let mut services = services.borrow_mut();
        if services.contains_key(&TypeId::of::<T>()) {
            return Err(RuntimeError::ServiceAlreadyInstalled(type_name::<T>()));
        }
        services.insert(TypeId::of::<T>(), service);
        Ok(())
    })
}

/// The installed `T`, if any.
#[must_use]
pub fn get<T: 'static>() -> Option<Rc<T>> {
    let service = SERVICES.with(|services| services.borrow().get(&TypeId::of::<T>()).cloned())?;
    service.downcast::<T>().ok()
}

/// The installed `T`.
///
/// # Errors
///
/// [`RuntimeError::ServiceMissing`] if no `T` is installed.
pub fn require<T: 'static>() -> RuntimeResult<Rc<T>> {
    get::<T>().ok_or(RuntimeError::ServiceMissing(type_name::<T>()))
}

/// Whether a `T` is installed.
#[must_use]
pub fn is_installed<T: 'static>() -> bool {
    SERVICES.with(|services| services.borrow().contains_key(&TypeId::of::<T>()))
}

/// Uninstalls the `T` and hands it back.
pub fn teardown<T: 'static>() -> Option<Rc<T>> {
    let service = SERVICES.with(|services| services.borrow_mut().remove(&TypeId::of::<T>()))?;
    service.downcast::<T>().ok()
}

/// Uninstalls every service on this thread.
pub fn teardown_all() {
    let all = SERVICES.with(|services| std::mem::take(&mut *services.borrow_mut()));
    // Dropped outside the borrow: a service's Drop may query the registry.
    drop(all);
}

/// The installed event dispatcher.
///
/// # Errors
///
/// [`RuntimeError::ServiceMissing`] if none is installed.
pub fn dispatcher() -> RuntimeResult<Rc<EventDispatcher>> {
    require::<EventDispatcher>()
}

/// The installed pool manager for prefab type `P`.
///
/// # Errors
///
/// [`RuntimeError::ServiceMissing`] if none is installed.
pub fn pools<P: Prefab>() -> RuntimeResult<SharedPools<P>> {
    require::<RefCell<PoolManager<P>>>()
}
