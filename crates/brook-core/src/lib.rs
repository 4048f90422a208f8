#![forbid(unsafe_code)]

//! Reactive primitives: signals, cold sources, state cells, schedulers.
//!
//! This crate is the engine under the view-model layer. Everything here is
//! single-threaded by construction (`Rc`-based, `!Send`): one view-model
//! instance owns one signal graph, and all propagation runs synchronously in
//! the call stack that triggered it. Deferral happens only through a
//! [`Scheduler`].
//!
//! Start with [`Signal`] (hot stream with a distinct error channel),
//! [`Source`] (cold restartable producer), [`StateCell`] (mutable holder
//! whose [`producer`](StateCell::producer) replays the current value), and
//! [`TestScheduler`] (virtual clock for deterministic timing tests).

pub mod cell;
pub mod sched;
pub mod signal;
pub mod source;

pub use cell::StateCell;
pub use sched::{Scheduled, Scheduler, SystemScheduler, TestScheduler};
pub use signal::{Never, Signal, SignalSink, Subscription};
pub use source::Source;
