#![forbid(unsafe_code)]

//! Brook: a reactive view-model engine.
//!
//! Typed push-based signals with a separate error channel, cold restartable
//! sources, replay-on-subscribe state cells, virtual and wall-clock
//! schedulers, an explicit environment of substitutable collaborators, and
//! the Inputs/Outputs/Errors view-model idiom.
//!
//! This crate re-exports the public surface of the workspace; depend on it
//! unless you need exactly one layer.
//!
//! ```
//! use std::time::Duration;
//! use brook::{Signal, TestScheduler};
//!
//! let scheduler = TestScheduler::new();
//! let (signal, sink) = Signal::<u32>::pipe();
//! let settled = signal.debounce(Duration::from_millis(100), scheduler.handle());
//! let _sub = settled.subscribe(|v| println!("settled on {v}"));
//!
//! sink.send(1);
//! sink.send(2);
//! scheduler.advance_by(Duration::from_millis(100)); // prints "settled on 2"
//! ```

// --- Reactive primitives -------------------------------------------------

pub use brook_core::{
    Never, Scheduled, Scheduler, Signal, SignalSink, Source, StateCell, Subscription,
    SystemScheduler, TestScheduler,
};

// --- Environment & collaborators -----------------------------------------

pub use brook_env::{
    Analytics, Comment, CommentTarget, CurrentUser, DEFAULT_DEBOUNCE_INTERVAL, Environment,
    EnvironmentBuilder, EnvironmentStack, ErrorEnvelope, FeatureFlags, IdentityStrings,
    KeyedStrings, NoopAnalytics, Playlist, Project, Service, StringTable, Update, User,
    user_facing_message,
};

// --- View-models ----------------------------------------------------------

pub use brook_vm::{
    CommentComposerErrors, CommentComposerInputs, CommentComposerOutputs,
    CommentComposerViewModel, DebouncedSelection, FeedErrors, FeedInputs, FeedOutputs,
    FeedViewModel, NowPlaying, ViewModel,
};

/// Common imports for building a view-model.
pub mod prelude {
    pub use brook_core::{Never, Scheduler, Signal, Source, StateCell, Subscription};
    pub use brook_env::{Environment, ErrorEnvelope, Service};
    pub use brook_vm::ViewModel;
}
