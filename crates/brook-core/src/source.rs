#![forbid(unsafe_code)]

//! Cold, restartable producers.
//!
//! A [`Source<T, E>`] describes work that produces a stream of values; the
//! work runs once per [`start`](Source::start), each start independent of
//! every other. Service capabilities return sources so that every caller
//! observes a full response and a superseding caller can cancel an in-flight
//! one structurally (dropping the start's [`Subscription`]).
//!
//! Contrast with [`Signal`]: a signal is hot (events happen whether or not
//! anyone listens), a source is cold (nothing happens until started).
//!
//! # Invariants
//!
//! 1. Each `start` invokes the producer closure exactly once with a fresh
//!    sink; starts never share state unless the closure captures it.
//! 2. Dropping the subscription returned by `start` runs the producer's
//!    teardown; events already delivered stand.
//! 3. [`start_with`](Source::start_with) attaches its observer before
//!    running the producer, so fully synchronous producers lose no events.

use std::rc::Rc;

use crate::signal::{Signal, SignalSink, Subscription};

/// Cold producer of a `T` stream with error channel `E`.
///
/// Cheap to clone; clones share the producer closure.
pub struct Source<T: 'static, E: 'static = crate::Never> {
    start: Rc<dyn Fn(SignalSink<T, E>) -> Subscription>,
}

impl<T: 'static, E: 'static> Clone for Source<T, E> {
    fn clone(&self) -> Self {
        Self {
            start: Rc::clone(&self.start),
        }
    }
}

impl<T: 'static, E: 'static> std::fmt::Debug for Source<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source").finish()
    }
}

impl<T: 'static, E: 'static> Source<T, E> {
    /// A source from a producer closure. The closure receives the sink for
    /// this start and returns the teardown subscription.
    pub fn new(start: impl Fn(SignalSink<T, E>) -> Subscription + 'static) -> Self {
        Self {
            start: Rc::new(start),
        }
    }

    /// A source that emits nothing and completes immediately.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(|sink| {
            sink.complete();
            Subscription::empty()
        })
    }

    /// A source that fails immediately.
    pub fn failed(error: E) -> Self
    where
        E: Clone,
    {
        Self::new(move |sink| {
            sink.fail(error.clone());
            Subscription::empty()
        })
    }

    /// Run the producer once, delivering into `sink`.
    pub fn start(&self, sink: SignalSink<T, E>) -> Subscription {
        (self.start)(sink)
    }

    /// Run the producer once with inline observers.
    ///
    /// The observer attaches before the producer runs; synchronous emissions
    /// are delivered. Dropping the returned subscription detaches the
    /// observer and runs the producer's teardown.
    pub fn start_with(
        &self,
        on_value: impl Fn(&T) + 'static,
        on_error: impl Fn(&E) + 'static,
        on_complete: impl Fn() + 'static,
    ) -> Subscription {
        let (signal, sink) = Signal::<T, E>::pipe();
        let observer = signal.subscribe_with(on_value, on_error, on_complete);
        let work = self.start(sink);
        Subscription::join(vec![observer, work])
    }

    /// Transform each produced value.
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Source<U, E>
    where
        E: Clone,
    {
        let source = self.clone();
        let f = Rc::new(f);
        Source::new(move |sink: SignalSink<U, E>| {
            let f = Rc::clone(&f);
            let err = sink.clone();
            let done = sink.clone();
            source.start_with(
                move |v| sink.send(f(v)),
                move |e| err.fail(e.clone()),
                move || done.complete(),
            )
        })
    }

    /// Side hooks around each start: `started` runs as the work begins,
    /// `terminated` when it errors or completes. Loading-indicator
    /// bookkeeping lives here.
    pub fn on_lifecycle(
        &self,
        started: impl Fn() + 'static,
        terminated: impl Fn() + 'static,
    ) -> Source<T, E>
    where
        T: Clone,
        E: Clone,
    {
        let source = self.clone();
        let started = Rc::new(started);
        let terminated = Rc::new(terminated);
        Source::new(move |sink: SignalSink<T, E>| {
            started();
            let term_err = Rc::clone(&terminated);
            let term_done = Rc::clone(&terminated);
            let err = sink.clone();
            let done = sink.clone();
            source.start_with(
                move |v| sink.send(v.clone()),
                move |e| {
                    term_err();
                    err.fail(e.clone());
                },
                move || {
                    term_done();
                    done.complete();
                },
            )
        })
    }

    /// Fold failures into the value channel: each start yields `Ok` values
    /// and at most one `Err`, then completes.
    pub fn materialize(&self) -> Source<Result<T, E>, crate::Never>
    where
        T: Clone,
        E: Clone,
    {
        let source = self.clone();
        Source::new(move |sink: SignalSink<Result<T, E>, crate::Never>| {
            let err = sink.clone();
            let done = sink.clone();
            source.start_with(
                move |v| sink.send(Ok(v.clone())),
                move |e| {
                    err.send(Err(e.clone()));
                    err.complete();
                },
                move || done.complete(),
            )
        })
    }
}

impl<T: Clone + 'static, E: 'static> Source<T, E> {
    /// A source that emits one value and completes.
    pub fn value(value: T) -> Self {
        Self::new(move |sink| {
            sink.send(value.clone());
            sink.complete();
            Subscription::empty()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
