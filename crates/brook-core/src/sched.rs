#![forbid(unsafe_code)]

//! Deferred execution for time-based operators.
//!
//! The [`Scheduler`] trait is the single capability signals need from time:
//! run a closure once, after a delay, with a cancellation token. Two
//! implementations share the timer-queue discipline:
//!
//! - [`TestScheduler`] holds a virtual clock that only moves when a test
//!   calls [`advance_by`](TestScheduler::advance_by). Due actions fire in
//!   timestamp order, FIFO within the same timestamp. Deterministic; no
//!   sleeps anywhere.
//! - [`SystemScheduler`] keys the same queue by [`Instant`] and is pumped by
//!   the host loop via [`run_until_idle`](SystemScheduler::run_until_idle).
//!   No timer threads: scheduled closures capture `Rc` state and must fire
//!   on the owning thread.
//!
//! # Invariants
//!
//! 1. Actions never fire before their due time.
//! 2. Actions with distinct due times fire in due-time order; ties fire in
//!    scheduling order.
//! 3. A cancelled token's action never fires, even if already due.
//! 4. An action may schedule further actions; within one `advance_by` call,
//!    newly scheduled work that falls due inside the advanced window fires
//!    in the same pass.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Scheduler capability
// ---------------------------------------------------------------------------

/// Deferred-execution capability consumed by `debounce`, `delay`, and the
/// selection state machine.
pub trait Scheduler {
    /// Run `action` once, `delay` from now. The returned token cancels the
    /// firing; dropping the token without cancelling lets it fire.
    fn schedule_after(&self, delay: Duration, action: Box<dyn FnOnce()>) -> Scheduled;
}

/// Cancellation token for a scheduled action.
///
/// Cloning shares the token; cancelling any clone cancels the firing.
/// Dropping does not cancel.
#[derive(Clone)]
pub struct Scheduled {
    cancelled: Rc<Cell<bool>>,
}

impl Scheduled {
    fn new() -> (Self, Rc<Cell<bool>>) {
        let cancelled = Rc::new(Cell::new(false));
        (
            Self {
                cancelled: Rc::clone(&cancelled),
            },
            cancelled,
        )
    }

    /// Make the eventual firing a no-op.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl std::fmt::Debug for Scheduled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduled")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Timer queue core
// ---------------------------------------------------------------------------

struct TimerEntry<K> {
    due: K,
    seq: u64,
    cancelled: Rc<Cell<bool>>,
    action: Box<dyn FnOnce()>,
}

impl<K: Ord> PartialEq for TimerEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<K: Ord> Eq for TimerEntry<K> {}

impl<K: Ord> PartialOrd for TimerEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for TimerEntry<K> {
    // Reversed so the max-heap pops the earliest (due, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ---------------------------------------------------------------------------
// TestScheduler
// ---------------------------------------------------------------------------

struct TestSchedulerInner {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<TimerEntry<Duration>>,
}

/// Virtual-clock scheduler for deterministic timing tests.
///
/// Clones share the same clock and queue. Pass [`handle`](Self::handle) to
/// operators that take `Rc<dyn Scheduler>`.
#[derive(Clone)]
pub struct TestScheduler {
    inner: Rc<RefCell<TestSchedulerInner>>,
}

impl Default for TestScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TestScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(TestSchedulerInner {
                now: Duration::ZERO,
                seq: 0,
                queue: BinaryHeap::new(),
            })),
        }
    }

    /// This scheduler as the trait object operators expect.
    #[must_use]
    pub fn handle(&self) -> Rc<dyn Scheduler> {
        Rc::new(self.clone())
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Pending (non-cancelled entries may still be superseded) queue length.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Move the clock forward by `interval`, firing every due action.
    pub fn advance_by(&self, interval: Duration) {
        let target = self.inner.borrow().now + interval;
        self.advance_to(target);
    }

    /// Move the clock to `target` (no-op if already past), firing every due
    /// action in (due, scheduling) order. Actions scheduled during the pass
    /// also fire if they fall due within the window.
    pub fn advance_to(&self, target: Duration) {
        loop {
            let entry = {
                let mut inner = self.inner.borrow_mut();
                match inner.queue.peek() {
                    Some(head) if head.due <= target => {
                        let entry = inner.queue.pop().expect("peeked entry");
                        inner.now = inner.now.max(entry.due);
                        Some(entry)
                    }
                    _ => None,
                }
            };
            let Some(entry) = entry else { break };
            if entry.cancelled.get() {
                continue;
            }
            tracing::trace!(due_ms = entry.due.as_millis() as u64, "timer fired");
            // Borrow released: the action may re-entrantly schedule.
            (entry.action)();
        }
        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(target);
    }
}

impl Scheduler for TestScheduler {
    fn schedule_after(&self, delay: Duration, action: Box<dyn FnOnce()>) -> Scheduled {
        let (token, cancelled) = Scheduled::new();
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + delay;
        let seq = inner.seq;
        inner.seq += 1;
        inner.queue.push(TimerEntry {
            due,
            seq,
            cancelled,
            action,
        });
        token
    }
}

// ---------------------------------------------------------------------------
// SystemScheduler
// ---------------------------------------------------------------------------

struct SystemSchedulerInner {
    seq: u64,
    queue: BinaryHeap<TimerEntry<Instant>>,
}

/// Wall-clock scheduler pumped by the host loop.
///
/// Call [`run_until_idle`](Self::run_until_idle) from the event loop;
/// [`next_due`](Self::next_due) tells the loop how long it may block.
#[derive(Clone)]
pub struct SystemScheduler {
    inner: Rc<RefCell<SystemSchedulerInner>>,
}

impl Default for SystemScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SystemSchedulerInner {
                seq: 0,
                queue: BinaryHeap::new(),
            })),
        }
    }

    #[must_use]
    pub fn handle(&self) -> Rc<dyn Scheduler> {
        Rc::new(self.clone())
    }

    /// Earliest non-fired deadline, if any. Cancelled entries still occupy
    /// the queue until their deadline passes.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.inner.borrow().queue.peek().map(|e| e.due)
    }

    /// Fire everything due at or before `Instant::now()`. Returns the number
    /// of actions run (cancelled entries are discarded uncounted).
    pub fn run_until_idle(&self) -> usize {
        let now = Instant::now();
        let mut fired = 0;
        loop {
            let entry = {
                let mut inner = self.inner.borrow_mut();
                match inner.queue.peek() {
                    Some(head) if head.due <= now => inner.queue.pop(),
                    _ => None,
                }
            };
            let Some(entry) = entry else { break };
            if entry.cancelled.get() {
                continue;
            }
            (entry.action)();
            fired += 1;
        }
        fired
    }
}

impl Scheduler for SystemScheduler {
    fn schedule_after(&self, delay: Duration, action: Box<dyn FnOnce()>) -> Scheduled {
        let (token, cancelled) = Scheduled::new();
        let mut inner = self.inner.borrow_mut();
        let seq = inner.seq;
        inner.seq += 1;
        inner.queue.push(TimerEntry {
            due: Instant::now() + delay,
            seq,
            cancelled,
            action,
        });
        token
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
