#![forbid(unsafe_code)]

//! Debounced selection: commit a focused item only after it holds focus for
//! a quiet interval.
//!
//! Remote-focus UIs move focus through many items on the way to the one the
//! user wants; committing each of them would fire a network call per
//! traversed row. This machine commits a focus only after it survives
//! `interval` without being superseded.
//!
//! # States
//!
//! - **Idle** — nothing focused yet.
//! - **Pending(item)** — focused, timer running; a different focus cancels
//!   and replaces it, the same focus is a no-op (the timer is not reset).
//! - **Committed(item)** — the focus survived; refocusing the committed
//!   item is a no-op.
//!
//! # Invariants
//!
//! 1. At most one timer is live at any time.
//! 2. A superseded pending item is never committed, however late the clock
//!    runs: each focus bumps a generation counter and a firing with a stale
//!    generation is dropped.
//! 3. The active-selection output replays the latest committed item to new
//!    subscribers (`None` before the first commit).

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use brook_core::{Never, Scheduled, Scheduler, Signal, SignalSink, Source, StateCell};

enum Phase<T> {
    Idle,
    Pending(T),
    Committed(T),
}

struct SelectionInner<T> {
    phase: Phase<T>,
    generation: u64,
    pending_timer: Option<Scheduled>,
    commit_count: u64,
}

/// The debounced-selection state machine.
///
/// Clones share the same machine.
pub struct DebouncedSelection<T: Clone + PartialEq + 'static> {
    inner: Rc<RefCell<SelectionInner<T>>>,
    interval: Duration,
    scheduler: Rc<dyn Scheduler>,
    active: StateCell<Option<T>>,
    commit_signal: Signal<T, Never>,
    commit_sink: SignalSink<T, Never>,
}

impl<T: Clone + PartialEq + 'static> Clone for DebouncedSelection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            interval: self.interval,
            scheduler: Rc::clone(&self.scheduler),
            active: self.active.clone(),
            commit_signal: self.commit_signal.clone(),
            commit_sink: self.commit_sink.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> DebouncedSelection<T> {
    #[must_use]
    pub fn new(interval: Duration, scheduler: Rc<dyn Scheduler>) -> Self {
        let (commit_signal, commit_sink) = Signal::pipe();
        Self {
            inner: Rc::new(RefCell::new(SelectionInner {
                phase: Phase::Idle,
                generation: 0,
                pending_timer: None,
                commit_count: 0,
            })),
            interval,
            scheduler,
            active: StateCell::new(None),
            commit_signal,
            commit_sink,
        }
    }

    /// Focus `item`. Starts (or restarts, for a different item) the commit
    /// timer; a no-op when `item` is already pending or committed.
    pub fn focus(&self, item: T) {
        let generation = {
            let mut inner = self.inner.borrow_mut();
            match &inner.phase {
                Phase::Pending(pending) if *pending == item => return,
                Phase::Committed(committed) if *committed == item => return,
                _ => {}
            }
            if let Some(timer) = inner.pending_timer.take() {
                timer.cancel();
                tracing::trace!("pending selection superseded");
            }
            inner.generation += 1;
            inner.phase = Phase::Pending(item.clone());
            inner.generation
        };

        let weak: Weak<RefCell<SelectionInner<T>>> = Rc::downgrade(&self.inner);
        let active = self.active.clone();
        let sink = self.commit_sink.clone();
        let timer = self.scheduler.schedule_after(
            self.interval,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else { return };
                {
                    let mut inner = inner.borrow_mut();
                    if inner.generation != generation {
                        // Superseded after scheduling but before firing.
                        return;
                    }
                    inner.phase = Phase::Committed(item.clone());
                    inner.pending_timer = None;
                    inner.commit_count += 1;
                }
                tracing::debug!("selection committed");
                active.write(Some(item.clone()));
                sink.send(item.clone());
            }),
        );
        self.inner.borrow_mut().pending_timer = Some(timer);
    }

    /// The latest committed item.
    #[must_use]
    pub fn committed(&self) -> Option<T> {
        match &self.inner.borrow().phase {
            Phase::Committed(item) => Some(item.clone()),
            _ => None,
        }
    }

    /// Whether a focus is waiting out its quiet interval.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.inner.borrow().phase, Phase::Pending(_))
    }

    /// Commits so far.
    #[must_use]
    pub fn commit_count(&self) -> u64 {
        self.inner.borrow().commit_count
    }

    /// Commit stream: one emission per commit, no replay.
    #[must_use]
    pub fn commits(&self) -> Signal<T, Never> {
        self.commit_signal.clone()
    }

    /// Property stream of the committed item: replays the current value
    /// (`None` before the first commit), then each commit.
    #[must_use]
    pub fn active(&self) -> Source<Option<T>, Never> {
        self.active.producer()
    }
}

impl<T: Clone + PartialEq + 'static> std::fmt::Debug for DebouncedSelection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let phase = match inner.phase {
            Phase::Idle => "idle",
            Phase::Pending(_) => "pending",
            Phase::Committed(_) => "committed",
        };
        f.debug_struct("DebouncedSelection")
            .field("phase", &phase)
            .field("commit_count", &inner.commit_count)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use brook_core::TestScheduler;
    use std::cell::Cell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn machine(scheduler: &TestScheduler) -> DebouncedSelection<&'static str> {
        DebouncedSelection::new(ms(1200), scheduler.handle())
    }

    #[test]
    fn commit_happens_only_after_the_full_interval() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);

        selection.focus("a");
        assert!(selection.is_pending());
        scheduler.advance_by(ms(1199));
        assert_eq!(selection.committed(), None);
        scheduler.advance_by(ms(1));
        assert_eq!(selection.committed(), Some("a"));
        assert!(!selection.is_pending());
    }

    #[test]
    fn refocus_restarts_the_interval_for_the_new_item() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);

        selection.focus("a");
        scheduler.advance_by(ms(500));
        selection.focus("b");
        scheduler.advance_by(ms(1199));
        assert_eq!(selection.committed(), None, "b needs its own full interval");
        scheduler.advance_by(ms(1));
        assert_eq!(selection.committed(), Some("b"));
    }

    #[test]
    fn superseded_item_is_never_committed() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);
        let commits: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let c = Rc::clone(&commits);
        let _sub = selection.commits().subscribe(move |item| c.borrow_mut().push(item));

        selection.focus("a");
        scheduler.advance_by(ms(1100));
        selection.focus("b");
        scheduler.advance_by(ms(5000));
        assert_eq!(*commits.borrow(), vec!["b"]);
    }

    #[test]
    fn refocusing_the_pending_item_does_not_reset_the_timer() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);

        selection.focus("a");
        scheduler.advance_by(ms(1000));
        selection.focus("a");
        scheduler.advance_by(ms(200));
        assert_eq!(selection.committed(), Some("a"), "timer kept its original deadline");
    }

    #[test]
    fn refocusing_the_committed_item_is_a_no_op() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);

        selection.focus("a");
        scheduler.advance_by(ms(1200));
        assert_eq!(selection.commit_count(), 1);

        selection.focus("a");
        assert!(!selection.is_pending());
        scheduler.advance_by(ms(5000));
        assert_eq!(selection.commit_count(), 1);
    }

    #[test]
    fn committed_then_new_focus_commits_the_new_item() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);

        selection.focus("a");
        scheduler.advance_by(ms(1200));
        selection.focus("b");
        scheduler.advance_by(ms(1200));
        assert_eq!(selection.committed(), Some("b"));
        assert_eq!(selection.commit_count(), 2);
    }

    #[test]
    fn active_replays_none_before_first_commit() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);
        let replayed: Rc<RefCell<Vec<Option<&'static str>>>> = Rc::new(RefCell::new(Vec::new()));
        let r = Rc::clone(&replayed);
        let _sub = selection
            .active()
            .start_with(move |v| r.borrow_mut().push(*v), |_| {}, || {});

        assert_eq!(*replayed.borrow(), vec![None]);
        selection.focus("a");
        scheduler.advance_by(ms(1200));
        assert_eq!(*replayed.borrow(), vec![None, Some("a")]);
    }

    #[test]
    fn active_replays_the_committed_item_to_late_subscribers() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);
        selection.focus("a");
        scheduler.advance_by(ms(1200));

        let got = Rc::new(Cell::new(None));
        let g = Rc::clone(&got);
        let _sub = selection
            .active()
            .start_with(move |v| g.set(*v), |_| {}, || {});
        assert_eq!(got.get(), Some("a"));
    }

    #[test]
    fn at_most_one_timer_live_across_rapid_refocus() {
        let scheduler = TestScheduler::new();
        let selection = machine(&scheduler);
        let commits = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&commits);
        let _sub = selection.commits().subscribe(move |_| c.set(c.get() + 1));

        for item in ["a", "b", "c", "d", "e"] {
            selection.focus(item);
            scheduler.advance_by(ms(100));
        }
        scheduler.advance_by(ms(10_000));
        assert_eq!(commits.get(), 1, "only the last focus commits");
        assert_eq!(selection.committed(), Some("e"));
    }
}
