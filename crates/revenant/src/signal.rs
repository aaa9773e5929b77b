//! Parameterless multicast callback list.
//!
//! The lightweight sibling of the event dispatcher for hooks owned by one
//! object, such as the frame driver's end-of-frame hook.

use std::fmt;

/// Handle returned by [`Signal::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignalHandle(u64);

/// An ordered list of `FnMut()` handlers run together.
#[derive(Default)]
pub struct Signal {
    handlers: Vec<(SignalHandle, Box<dyn FnMut()>)>,
    next: u64,
}

impl Signal {
    /// Creates an empty signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add(&mut self, handler: impl FnMut() + 'static) -> SignalHandle {
        let handle = SignalHandle(self.next);
        self.next += 1;
        self.handlers.push((handle, Box::new(handler)));
        handle
    }

    /// Removes a handler. Returns whether it was present.
    pub fn remove(&mut self, handle: SignalHandle) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != handle);
        self.handlers.len() != before
    }

    /// Runs every handler in the order they were added.
    pub fn run(&mut self) {
        for (_, handler) in &mut self.handlers {
            handler();
        }
    }

    /// Number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_run_in_order_and_remove() {
        let log: Rc<RefCell<Vec<u8>>> = Rc::default();
        let mut signal = Signal::new();

        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        let first = signal.add(move || a.borrow_mut().push(1));
        signal.add(move || b.borrow_mut().push(2));

        signal.run();
        assert!(signal.remove(first));
        assert!(!signal.remove(first));
        signal.run();

        assert_eq!(*log.borrow(), vec![1, 2, 2]);
        assert_eq!(signal.len(), 1);
    }

    #[test]
    fn test_empty_signal_runs() {
        let mut signal = Signal::default();
        assert!(signal.is_empty());
        signal.run();
    }
}
