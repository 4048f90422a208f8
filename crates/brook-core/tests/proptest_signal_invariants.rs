//! Property tests for signal operator invariants on the virtual clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;

use brook_core::{Scheduler, Signal, TestScheduler};

fn observed<T: Clone + 'static>(signal: &Signal<T>) -> (Rc<RefCell<Vec<T>>>, brook_core::Subscription) {
    let seen: Rc<RefCell<Vec<T>>> = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let sub = signal.subscribe(move |v| s.borrow_mut().push(v.clone()));
    (seen, sub)
}

proptest! {
    /// However values are spaced, debounce delivers exactly the values that
    /// were followed by a quiet period of at least the interval, in order,
    /// and the last value always settles once time runs out.
    #[test]
    fn debounce_delivers_exactly_the_settled_values(
        gaps in prop::collection::vec(0u64..3_000, 1..30),
        interval_ms in 1u64..2_000,
    ) {
        let interval = Duration::from_millis(interval_ms);
        let scheduler = TestScheduler::new();
        let (signal, sink) = Signal::<usize>::pipe();
        let debounced = signal.debounce(interval, scheduler.handle());
        let (seen, _sub) = observed(&debounced);

        let mut expected = Vec::new();
        for (i, gap) in gaps.iter().enumerate() {
            sink.send(i);
            scheduler.advance_by(Duration::from_millis(*gap));
            if Duration::from_millis(*gap) >= interval {
                expected.push(i);
            }
        }
        // Let the final value settle.
        scheduler.advance_by(interval);
        if expected.last() != Some(&(gaps.len() - 1)) {
            expected.push(gaps.len() - 1);
        }

        prop_assert_eq!(&*seen.borrow(), &expected);
    }

    /// skip_repeats output never contains two equal consecutive values, and
    /// applying it twice changes nothing.
    #[test]
    fn skip_repeats_is_idempotent(values in prop::collection::vec(0u8..5, 0..60)) {
        let (signal, sink) = Signal::<u8>::pipe();
        let once = signal.skip_repeats();
        let twice = once.skip_repeats();
        let (first, _a) = observed(&once);
        let (second, _b) = observed(&twice);

        for v in &values {
            sink.send(*v);
        }

        let first = first.borrow().clone();
        for pair in first.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
        prop_assert_eq!(&first, &*second.borrow());
    }

    /// take(n) emits min(n, len) values and completes exactly when the nth
    /// value arrives (or when upstream completes).
    #[test]
    fn take_bounds_emissions(
        values in prop::collection::vec(any::<i32>(), 0..40),
        n in 0usize..50,
    ) {
        let (signal, sink) = Signal::<i32>::pipe();
        let taken = signal.take(n);
        let (seen, _sub) = observed(&taken);

        for v in &values {
            sink.send(*v);
        }
        sink.complete();

        let expected: Vec<i32> = values.iter().take(n).copied().collect();
        prop_assert_eq!(&*seen.borrow(), &expected);
    }

    /// Timer actions fire in due-time order regardless of scheduling order.
    #[test]
    fn scheduler_fires_in_due_order(delays in prop::collection::vec(0u64..10_000, 1..40)) {
        let scheduler = TestScheduler::new();
        let fired: Rc<RefCell<Vec<u64>>> = Rc::new(RefCell::new(Vec::new()));

        for delay in &delays {
            let fired = Rc::clone(&fired);
            let due = *delay;
            let _ = scheduler.schedule_after(
                Duration::from_millis(due),
                Box::new(move || fired.borrow_mut().push(due)),
            );
        }
        scheduler.advance_by(Duration::from_millis(10_000));

        let fired = fired.borrow();
        prop_assert_eq!(fired.len(), delays.len());
        for pair in fired.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }
}
