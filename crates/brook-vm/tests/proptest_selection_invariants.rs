//! Property tests for the debounced-selection machine.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;

use brook_core::TestScheduler;
use brook_vm::DebouncedSelection;

const INTERVAL: Duration = Duration::from_millis(1200);

proptest! {
    /// Whatever the focus traffic looks like, once it goes quiet the last
    /// focused item is the committed one and every commit is an item that
    /// was actually focused.
    #[test]
    fn quiet_interval_commits_the_last_focus(
        steps in prop::collection::vec((0u8..6, 0u64..2_000), 1..40),
    ) {
        let scheduler = TestScheduler::new();
        let selection = DebouncedSelection::new(INTERVAL, scheduler.handle());
        let commits: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let c = Rc::clone(&commits);
        let _sub = selection.commits().subscribe(move |item| c.borrow_mut().push(*item));

        for (item, gap) in &steps {
            selection.focus(*item);
            scheduler.advance_by(Duration::from_millis(*gap));
        }
        scheduler.advance_by(INTERVAL);

        let last = steps.last().expect("non-empty").0;
        prop_assert_eq!(selection.committed(), Some(last));
        prop_assert!(!selection.is_pending());

        let commits = commits.borrow();
        let focused: Vec<u8> = steps.iter().map(|(item, _)| *item).collect();
        for committed in commits.iter() {
            prop_assert!(focused.contains(committed));
        }
        prop_assert_eq!(commits.last(), Some(&last));
        prop_assert_eq!(selection.commit_count(), commits.len() as u64);
    }
}
