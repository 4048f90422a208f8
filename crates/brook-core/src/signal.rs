#![forbid(unsafe_code)]

//! Push-based signal primitive with a distinct error channel.
//!
//! A [`Signal<T, E>`] is an ordered, potentially infinite sequence of values
//! of type `T` that may end with exactly one terminal event: an error of type
//! `E` or an explicit completion. Events are pushed synchronously to every
//! observer in subscription order. There is no replay: an observer sees only
//! events emitted after it subscribed (see [`StateCell`](crate::StateCell)
//! for the replay-on-subscribe variant).
//!
//! Signals are created in connected pairs via [`Signal::pipe`]: the
//! [`SignalSink`] half sends events, the `Signal` half is observed. All
//! composition operators ([`map`](Signal::map), [`filter`](Signal::filter),
//! [`combine_latest`](Signal::combine_latest), [`debounce`](Signal::debounce),
//! ...) are built on this pair.
//!
//! # Invariants
//!
//! 1. Observers are notified in subscription order, synchronously, in the
//!    sender's call stack.
//! 2. At most one terminal event is ever delivered; sends after a terminal
//!    event are ignored.
//! 3. Subscribing or unsubscribing from inside an observer callback never
//!    panics and never skips other observers (delivery snapshots the
//!    observer list before invoking callbacks).
//! 4. Dropping a [`Subscription`] stops future delivery; already-delivered
//!    events are not retracted.
//! 5. Operators propagate errors downstream unchanged and stop processing
//!    values afterwards, unless documented otherwise
//!    ([`materialize`](Signal::materialize) is the one that catches).
//!
//! # Threading
//!
//! Signals are `Rc`-based and deliberately `!Send`: one view-model instance
//! owns one signal graph and all propagation is serialized on its thread.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::sched::{Scheduled, Scheduler};
use crate::source::Source;

// ---------------------------------------------------------------------------
// Never
// ---------------------------------------------------------------------------

/// Uninhabited error type for signals that cannot fail.
///
/// A `Signal<T, Never>` has no error channel in practice; its observers'
/// error callbacks are provably unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Never {}

impl fmt::Display for Never {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

// ---------------------------------------------------------------------------
// Observer storage
// ---------------------------------------------------------------------------

struct ObserverFns<T, E> {
    on_value: Box<dyn Fn(&T)>,
    on_error: Box<dyn Fn(&E)>,
    on_complete: Box<dyn Fn()>,
}

struct Inner<T, E> {
    observers: Vec<(u64, Rc<ObserverFns<T, E>>)>,
    next_id: u64,
    terminated: bool,
    /// Upstream subscriptions and operator state kept alive for as long as
    /// this signal is. Cleared on terminal events so superseded upstream
    /// work is disconnected.
    keep_alive: Vec<Subscription>,
}

impl<T, E> Inner<T, E> {
    fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
            terminated: false,
            keep_alive: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// RAII handle for an active observation.
///
/// Dropping (or explicitly [`cancel`](Subscription::cancel)-ing) the
/// subscription detaches the observer; events already delivered are
/// unaffected.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// A subscription with custom teardown logic.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to tear down.
    #[must_use]
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Bundle several subscriptions into one; cancelling the bundle cancels
    /// all members.
    #[must_use]
    pub fn join(subs: Vec<Subscription>) -> Self {
        Self::new(move || drop(subs))
    }

    /// Cancel now instead of waiting for drop.
    pub fn cancel(mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// Observable half of a signal pair. See the module docs for semantics.
pub struct Signal<T: 'static, E: 'static = Never> {
    inner: Rc<RefCell<Inner<T, E>>>,
}

impl<T: 'static, E: 'static> Clone for Signal<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static, E: 'static> fmt::Debug for Signal<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("observers", &inner.observers.len())
            .field("terminated", &inner.terminated)
            .finish()
    }
}

/// Sending half of a signal pair.
///
/// Cloning the sink shares the same underlying signal. The sink keeps the
/// signal alive: a pipe stays deliverable for as long as any sink handle
/// exists.
pub struct SignalSink<T: 'static, E: 'static = Never> {
    inner: Rc<RefCell<Inner<T, E>>>,
}

impl<T: 'static, E: 'static> Clone for SignalSink<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static, E: 'static> fmt::Debug for SignalSink<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSink").finish()
    }
}

impl<T: 'static, E: 'static> SignalSink<T, E> {
    /// Send a value to every current observer, synchronously.
    ///
    /// No-op after a terminal event.
    pub fn send(&self, value: T) {
        let observers: Vec<Rc<ObserverFns<T, E>>> = {
            let inner = self.inner.borrow();
            if inner.terminated {
                return;
            }
            inner.observers.iter().map(|(_, o)| Rc::clone(o)).collect()
        };
        for obs in observers {
            (obs.on_value)(&value);
        }
    }

    /// Terminate the signal with an error. All observers are notified once
    /// and then detached.
    pub fn fail(&self, error: E) {
        let Some((observers, retained)) = self.terminate() else {
            return;
        };
        for (_, obs) in &observers {
            (obs.on_error)(&error);
        }
        drop(retained);
    }

    /// Terminate the signal with completion.
    pub fn complete(&self) {
        let Some((observers, retained)) = self.terminate() else {
            return;
        };
        for (_, obs) in &observers {
            (obs.on_complete)();
        }
        drop(retained);
    }

    /// Whether a terminal event has already been delivered.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.inner.borrow().terminated
    }

    /// Mark terminated and take the observer list and retained upstream
    /// subscriptions out, releasing the borrow before anything runs.
    #[allow(clippy::type_complexity)]
    fn terminate(&self) -> Option<(Vec<(u64, Rc<ObserverFns<T, E>>)>, Vec<Subscription>)> {
        let mut inner = self.inner.borrow_mut();
        if inner.terminated {
            return None;
        }
        inner.terminated = true;
        let observers = std::mem::take(&mut inner.observers);
        let retained = std::mem::take(&mut inner.keep_alive);
        drop(inner);
        tracing::trace!(observers = observers.len(), "signal terminated");
        Some((observers, retained))
    }
}

impl<T: 'static, E: 'static> Signal<T, E> {
    /// Create a connected (signal, sink) pair.
    #[must_use]
    pub fn pipe() -> (Signal<T, E>, SignalSink<T, E>) {
        let inner = Rc::new(RefCell::new(Inner::new()));
        (
            Signal {
                inner: Rc::clone(&inner),
            },
            SignalSink { inner },
        )
    }

    /// A signal that never emits and never terminates.
    #[must_use]
    pub fn never() -> Signal<T, E> {
        Signal::pipe().0
    }

    /// Subscribe to values only. Errors and completion are silently ignored
    /// by this observer (other observers still see them).
    pub fn subscribe(&self, on_value: impl Fn(&T) + 'static) -> Subscription {
        self.subscribe_with(on_value, |_| {}, || {})
    }

    /// Subscribe with value, error, and completion callbacks.
    ///
    /// If the signal has already terminated, nothing is ever delivered and
    /// the returned subscription is inert.
    pub fn subscribe_with(
        &self,
        on_value: impl Fn(&T) + 'static,
        on_error: impl Fn(&E) + 'static,
        on_complete: impl Fn() + 'static,
    ) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        if inner.terminated {
            return Subscription::empty();
        }
        let id = inner.next_id;
        inner.next_id += 1;
        inner.observers.push((
            id,
            Rc::new(ObserverFns {
                on_value: Box::new(on_value),
                on_error: Box::new(on_error),
                on_complete: Box::new(on_complete),
            }),
        ));
        drop(inner);

        let weak: Weak<RefCell<Inner<T, E>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(rc) = weak.upgrade() {
                rc.borrow_mut().observers.retain(|(oid, _)| *oid != id);
            }
        })
    }

    /// Number of currently attached observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// Whether a terminal event has already been delivered.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.inner.borrow().terminated
    }

    /// Tie an upstream subscription's lifetime to this signal.
    pub(crate) fn retain(&self, sub: Subscription) {
        self.inner.borrow_mut().keep_alive.push(sub);
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

impl<T: 'static, E: Clone + 'static> Signal<T, E> {
    /// Transform each value; errors pass through untouched.
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Signal<U, E> {
        let (out, sink) = Signal::<U, E>::pipe();
        let err = sink.clone();
        let done = sink.clone();
        let sub = self.subscribe_with(
            move |v| sink.send(f(v)),
            move |e| err.fail(e.clone()),
            move || done.complete(),
        );
        out.retain(sub);
        out
    }

    /// Replace every value with a constant.
    pub fn map_to<U: Clone + 'static>(&self, value: U) -> Signal<U, E> {
        self.map(move |_| value.clone())
    }

    /// Keep only the values for which `f` returns `Some`, unwrapped.
    pub fn filter_map<U: 'static>(&self, f: impl Fn(&T) -> Option<U> + 'static) -> Signal<U, E> {
        let (out, sink) = Signal::<U, E>::pipe();
        let err = sink.clone();
        let done = sink.clone();
        let sub = self.subscribe_with(
            move |v| {
                if let Some(mapped) = f(v) {
                    sink.send(mapped);
                }
            },
            move |e| err.fail(e.clone()),
            move || done.complete(),
        );
        out.retain(sub);
        out
    }

    /// Convert failures into values: the output never errors, and a failure
    /// arrives as `Err(e)` followed by completion.
    pub fn materialize(&self) -> Signal<Result<T, E>, Never>
    where
        T: Clone,
    {
        let (out, sink) = Signal::<Result<T, E>, Never>::pipe();
        let err = sink.clone();
        let done = sink.clone();
        let sub = self.subscribe_with(
            move |v| sink.send(Ok(v.clone())),
            move |e| {
                err.send(Err(e.clone()));
                err.complete();
            },
            move || done.complete(),
        );
        out.retain(sub);
        out
    }

    /// Map each value to a cold [`Source`] and forward events from only the
    /// most recently produced one.
    ///
    /// Starting a new inner source drops the previous inner subscription
    /// first, so a superseded in-flight operation can never deliver.
    pub fn switch_map<U: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> Source<U, E> + 'static,
    ) -> Signal<U, E> {
        let (out, sink) = Signal::<U, E>::pipe();
        let err = sink.clone();
        let done = sink.clone();
        let current: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let sub = self.subscribe_with(
            move |v| {
                let source = f(v);
                // Disconnect the superseded inner stream before starting the
                // next one: cancellation, not delay-stacking.
                current.borrow_mut().take();
                let vs = sink.clone();
                let es = sink.clone();
                let started = source.start_with(
                    move |u| vs.send(u.clone()),
                    move |e| es.fail(e.clone()),
                    // Inner completion does not complete the switched output.
                    || {},
                );
                *current.borrow_mut() = Some(started);
            },
            move |e| err.fail(e.clone()),
            move || done.complete(),
        );
        out.retain(sub);
        out
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Signal<T, E> {
    /// Drop values failing the predicate; errors are never dropped.
    pub fn filter(&self, pred: impl Fn(&T) -> bool + 'static) -> Signal<T, E> {
        self.filter_map(move |v| if pred(v) { Some(v.clone()) } else { None })
    }

    /// Interleave several signals into one.
    ///
    /// Completes when all inputs have completed; the first error terminates
    /// the merge immediately.
    pub fn merge(signals: impl IntoIterator<Item = Signal<T, E>>) -> Signal<T, E> {
        let signals: Vec<Signal<T, E>> = signals.into_iter().collect();
        let (out, sink) = Signal::<T, E>::pipe();
        if signals.is_empty() {
            sink.complete();
            return out;
        }
        let remaining = Rc::new(Cell::new(signals.len()));
        for signal in &signals {
            let vs = sink.clone();
            let es = sink.clone();
            let cs = sink.clone();
            let remaining = Rc::clone(&remaining);
            let sub = signal.subscribe_with(
                move |v| vs.send(v.clone()),
                move |e| es.fail(e.clone()),
                move || {
                    remaining.set(remaining.get() - 1);
                    if remaining.get() == 0 {
                        cs.complete();
                    }
                },
            );
            out.retain(sub);
        }
        out
    }

    /// Emit a pair on every emission of either input, once both have emitted
    /// at least once. Either input's error propagates immediately.
    pub fn combine_latest<U: Clone + 'static>(&self, other: &Signal<U, E>) -> Signal<(T, U), E> {
        struct Latest<T, U> {
            left: Option<T>,
            right: Option<U>,
            left_done: bool,
            right_done: bool,
        }
        let (out, sink) = Signal::<(T, U), E>::pipe();
        let state = Rc::new(RefCell::new(Latest::<T, U> {
            left: None,
            right: None,
            left_done: false,
            right_done: false,
        }));

        let emit = |state: &RefCell<Latest<T, U>>, sink: &SignalSink<(T, U), E>| {
            let pair = {
                let state = state.borrow();
                match (&state.left, &state.right) {
                    (Some(l), Some(r)) => Some((l.clone(), r.clone())),
                    _ => None,
                }
            };
            if let Some(pair) = pair {
                sink.send(pair);
            }
        };

        {
            let state = Rc::clone(&state);
            let state_done = Rc::clone(&state);
            let vs = sink.clone();
            let es = sink.clone();
            let cs = sink.clone();
            let sub = self.subscribe_with(
                move |v| {
                    state.borrow_mut().left = Some(v.clone());
                    emit(&state, &vs);
                },
                move |e| es.fail(e.clone()),
                move || {
                    let mut s = state_done.borrow_mut();
                    s.left_done = true;
                    if s.right_done {
                        drop(s);
                        cs.complete();
                    }
                },
            );
            out.retain(sub);
        }
        {
            let state = Rc::clone(&state);
            let state_done = Rc::clone(&state);
            let vs = sink.clone();
            let es = sink.clone();
            let cs = sink;
            let sub = other.subscribe_with(
                move |v| {
                    state.borrow_mut().right = Some(v.clone());
                    emit(&state, &vs);
                },
                move |e| es.fail(e.clone()),
                move || {
                    let mut s = state_done.borrow_mut();
                    s.right_done = true;
                    if s.left_done {
                        drop(s);
                        cs.complete();
                    }
                },
            );
            out.retain(sub);
        }
        out
    }

    /// Emit the latest value of `self` each time `trigger` fires.
    ///
    /// Nothing is emitted for triggers arriving before the first value.
    /// Completes when the trigger completes.
    pub fn sample_on<S: 'static>(&self, trigger: &Signal<S, E>) -> Signal<T, E> {
        let (out, sink) = Signal::<T, E>::pipe();
        let latest: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));

        {
            let latest = Rc::clone(&latest);
            let es = sink.clone();
            let sub = self.subscribe_with(
                move |v| {
                    *latest.borrow_mut() = Some(v.clone());
                },
                move |e| es.fail(e.clone()),
                // Source completion does not end sampling; the held value
                // remains sampleable.
                || {},
            );
            out.retain(sub);
        }
        {
            let vs = sink.clone();
            let es = sink.clone();
            let cs = sink;
            let sub = trigger.subscribe_with(
                move |_| {
                    let sampled = latest.borrow().clone();
                    if let Some(v) = sampled {
                        vs.send(v);
                    }
                },
                move |e| es.fail(e.clone()),
                move || cs.complete(),
            );
            out.retain(sub);
        }
        out
    }

    /// Suppress consecutive duplicates per `eq`; the first value always
    /// passes.
    pub fn skip_repeats_by(&self, eq: impl Fn(&T, &T) -> bool + 'static) -> Signal<T, E> {
        let last: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));
        self.filter_map(move |v| {
            let mut last = last.borrow_mut();
            let repeat = last.as_ref().is_some_and(|prev| eq(prev, v));
            if repeat {
                None
            } else {
                *last = Some(v.clone());
                Some(v.clone())
            }
        })
    }

    /// [`skip_repeats_by`](Signal::skip_repeats_by) with `==`.
    pub fn skip_repeats(&self) -> Signal<T, E>
    where
        T: PartialEq,
    {
        self.skip_repeats_by(|a, b| a == b)
    }

    /// Pass through the first `count` values, then complete.
    pub fn take(&self, count: usize) -> Signal<T, E> {
        let (out, sink) = Signal::<T, E>::pipe();
        if count == 0 {
            sink.complete();
            return out;
        }
        let remaining = Rc::new(Cell::new(count));
        let vs = sink.clone();
        let es = sink.clone();
        let cs = sink;
        let sub = self.subscribe_with(
            move |v| {
                if remaining.get() == 0 {
                    return;
                }
                remaining.set(remaining.get() - 1);
                vs.send(v.clone());
                if remaining.get() == 0 {
                    vs.complete();
                }
            },
            move |e| es.fail(e.clone()),
            move || cs.complete(),
        );
        out.retain(sub);
        out
    }

    /// Emit a value only after `interval` has elapsed without a newer value.
    ///
    /// Each arrival invalidates the previously scheduled emission and
    /// schedules a fresh one; only an emission that survives unsuperseded is
    /// delivered. Completion cancels any pending emission; errors propagate
    /// immediately.
    pub fn debounce(&self, interval: Duration, scheduler: Rc<dyn Scheduler>) -> Signal<T, E> {
        let (out, sink) = Signal::<T, E>::pipe();
        let pending: Rc<RefCell<Option<Scheduled>>> = Rc::new(RefCell::new(None));

        let vs = sink.clone();
        let es = sink.clone();
        let cs = sink;
        let pending_err = Rc::clone(&pending);
        let pending_done = Rc::clone(&pending);
        let sub = self.subscribe_with(
            move |v| {
                if let Some(prev) = pending.borrow_mut().take() {
                    prev.cancel();
                }
                let sink = vs.clone();
                let value = v.clone();
                let token =
                    scheduler.schedule_after(interval, Box::new(move || sink.send(value)));
                *pending.borrow_mut() = Some(token);
            },
            move |e| {
                if let Some(prev) = pending_err.borrow_mut().take() {
                    prev.cancel();
                }
                es.fail(e.clone());
            },
            move || {
                if let Some(prev) = pending_done.borrow_mut().take() {
                    prev.cancel();
                }
                cs.complete();
            },
        );
        out.retain(sub);
        out
    }

    /// Shift each value (and completion) later by `interval`. Errors are
    /// forwarded immediately.
    pub fn delay(&self, interval: Duration, scheduler: Rc<dyn Scheduler>) -> Signal<T, E> {
        let (out, sink) = Signal::<T, E>::pipe();
        let vs = sink.clone();
        let es = sink.clone();
        let cs = sink;
        let value_sched = Rc::clone(&scheduler);
        let sub = self.subscribe_with(
            move |v| {
                let sink = vs.clone();
                let value = v.clone();
                let _ = value_sched.schedule_after(interval, Box::new(move || sink.send(value)));
            },
            move |e| es.fail(e.clone()),
            move || {
                let sink = cs.clone();
                let _ = scheduler.schedule_after(interval, Box::new(move || sink.complete()));
            },
        );
        out.retain(sub);
        out
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Signal<Source<T, E>, E> {
    /// For a signal of cold sources, stay subscribed only to the most
    /// recently emitted one; emitting a new source disconnects the previous
    /// one the instant it arrives.
    pub fn switch_to_latest(&self) -> Signal<T, E> {
        self.switch_map(Source::clone)
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Signal<Result<T, E>, Never> {
    /// The success half of a materialized signal.
    pub fn values(&self) -> Signal<T, Never> {
        self.filter_map(|r| r.as_ref().ok().cloned())
    }

    /// The failure half of a materialized signal.
    pub fn errors(&self) -> Signal<E, Never> {
        self.filter_map(|r| r.as_ref().err().cloned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
