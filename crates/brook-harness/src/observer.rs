#![forbid(unsafe_code)]

//! Event-recording observer for signal assertions.

use std::cell::RefCell;
use std::rc::Rc;

use brook_core::{Never, Signal, Source, Subscription};

struct Recorded<T, E> {
    values: Vec<T>,
    errors: Vec<E>,
    completions: usize,
}

/// Records every event a signal delivers, for assertion after the fact.
///
/// The observer holds its subscriptions; dropping it stops recording.
pub struct TestObserver<T: Clone + 'static, E: Clone + 'static = Never> {
    recorded: Rc<RefCell<Recorded<T, E>>>,
    subscriptions: Vec<Subscription>,
}

impl<T: Clone + 'static, E: Clone + 'static> Default for TestObserver<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static, E: Clone + 'static> TestObserver<T, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            recorded: Rc::new(RefCell::new(Recorded {
                values: Vec::new(),
                errors: Vec::new(),
                completions: 0,
            })),
            subscriptions: Vec::new(),
        }
    }

    /// Start recording `signal`'s events.
    pub fn observe(&mut self, signal: &Signal<T, E>) {
        let values = Rc::clone(&self.recorded);
        let errors = Rc::clone(&self.recorded);
        let completions = Rc::clone(&self.recorded);
        let sub = signal.subscribe_with(
            move |v| values.borrow_mut().values.push(v.clone()),
            move |e| errors.borrow_mut().errors.push(e.clone()),
            move || completions.borrow_mut().completions += 1,
        );
        self.subscriptions.push(sub);
    }

    /// Start `source` and record everything it produces.
    pub fn observe_source(&mut self, source: &Source<T, E>) {
        let values = Rc::clone(&self.recorded);
        let errors = Rc::clone(&self.recorded);
        let completions = Rc::clone(&self.recorded);
        let sub = source.start_with(
            move |v| values.borrow_mut().values.push(v.clone()),
            move |e| errors.borrow_mut().errors.push(e.clone()),
            move || completions.borrow_mut().completions += 1,
        );
        self.subscriptions.push(sub);
    }

    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.recorded.borrow().values.clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.recorded.borrow().values.last().cloned()
    }

    #[must_use]
    pub fn value_count(&self) -> usize {
        self.recorded.borrow().values.len()
    }

    #[must_use]
    pub fn did_emit_value(&self) -> bool {
        self.value_count() > 0
    }

    #[must_use]
    pub fn errors(&self) -> Vec<E> {
        self.recorded.borrow().errors.clone()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<E> {
        self.recorded.borrow().errors.last().cloned()
    }

    #[must_use]
    pub fn did_fail(&self) -> bool {
        !self.recorded.borrow().errors.is_empty()
    }

    #[must_use]
    pub fn did_complete(&self) -> bool {
        self.recorded.borrow().completions > 0
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static, E: Clone + 'static> TestObserver<T, E> {
    /// Assert the exact value sequence recorded so far.
    #[track_caller]
    pub fn assert_values(&self, expected: &[T]) {
        assert_eq!(self.recorded.borrow().values.as_slice(), expected);
    }
}
