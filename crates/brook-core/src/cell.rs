#![forbid(unsafe_code)]

//! Replayable mutable state for view-model inputs.
//!
//! A [`StateCell<T>`] holds the current value of one input. Writes are
//! synchronous: immediately visible to [`read`](StateCell::read) and pushed
//! to subscribers in write order, in the writer's call stack. Two stream
//! views exist:
//!
//! - [`signal`](StateCell::signal): changes only, no replay.
//! - [`producer`](StateCell::producer): a cold view that delivers the
//!   current value synchronously on start, then every subsequent write —
//!   the "property stream".
//!
//! Cells are `Rc`-based handles confined to the owning view-model's thread.
//! Every write notifies, including writes of a value equal to the current
//! one; compose with [`skip_repeats`](crate::Signal::skip_repeats) where
//! duplicate suppression is wanted.

use std::cell::RefCell;
use std::rc::Rc;

use crate::signal::{Never, Signal, SignalSink};
use crate::source::Source;

/// Single-owner mutable holder with change notification.
///
/// Clones share the same storage and change stream.
pub struct StateCell<T: Clone + 'static> {
    value: Rc<RefCell<T>>,
    signal: Signal<T, Never>,
    sink: SignalSink<T, Never>,
}

impl<T: Clone + 'static> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            signal: self.signal.clone(),
            sink: self.sink.clone(),
        }
    }
}

impl<T: Clone + std::fmt::Debug + 'static> std::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &*self.value.borrow())
            .finish()
    }
}

impl<T: Clone + 'static> StateCell<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (signal, sink) = Signal::pipe();
        Self {
            value: Rc::new(RefCell::new(initial)),
            signal,
            sink,
        }
    }

    /// Current value, cloned out.
    #[must_use]
    pub fn read(&self) -> T {
        self.value.borrow().clone()
    }

    /// Inspect the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Store `value` and notify subscribers synchronously, in write order.
    ///
    /// The store happens before notification, so observers reading the cell
    /// see the new value.
    pub fn write(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        self.sink.send(value);
    }

    /// Update in place through a closure, then notify.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let next = {
            let mut value = self.value.borrow_mut();
            f(&mut value);
            value.clone()
        };
        self.sink.send(next);
    }

    /// Change stream: future writes only, no replay of the current value.
    #[must_use]
    pub fn signal(&self) -> Signal<T, Never> {
        self.signal.clone()
    }

    /// Property stream: each start synchronously delivers the current value,
    /// then forwards every subsequent write.
    #[must_use]
    pub fn producer(&self) -> Source<T, Never> {
        let cell = self.clone();
        Source::new(move |sink: SignalSink<T, Never>| {
            sink.send(cell.read());
            let forward = sink.clone();
            cell.signal.subscribe(move |v| forward.send(v.clone()))
        })
    }
}

impl<T: Clone + Default + 'static> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
