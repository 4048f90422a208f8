#![forbid(unsafe_code)]

//! Scoped environment substitution for tests.
//!
//! The stack is LIFO and never empty: the base environment sits at the
//! bottom for the stack's whole lifetime. Production code does not use the
//! stack at all — view-models take `Rc<Environment>` directly. The test
//! harness pushes an override for the duration of a scope and pops it on
//! the way out, panic paths included (see `brook-harness`).
//!
//! # Failure Modes
//!
//! Popping the base environment is a programming error and panics.

use std::cell::RefCell;
use std::rc::Rc;

use crate::environment::Environment;

/// LIFO stack of environments with a permanent base.
pub struct EnvironmentStack {
    stack: RefCell<Vec<Rc<Environment>>>,
}

impl EnvironmentStack {
    #[must_use]
    pub fn new(base: Rc<Environment>) -> Self {
        Self {
            stack: RefCell::new(vec![base]),
        }
    }

    /// The top environment.
    #[must_use]
    pub fn current(&self) -> Rc<Environment> {
        Rc::clone(self.stack.borrow().last().expect("stack holds the base"))
    }

    /// Make `env` current until the matching [`pop`](Self::pop).
    pub fn push(&self, env: Rc<Environment>) {
        let mut stack = self.stack.borrow_mut();
        stack.push(env);
        tracing::debug!(depth = stack.len(), "environment pushed");
    }

    /// Restore the previously current environment.
    ///
    /// # Panics
    ///
    /// Panics if the pop would remove the base environment: pops must pair
    /// with pushes.
    pub fn pop(&self) -> Rc<Environment> {
        let mut stack = self.stack.borrow_mut();
        assert!(
            stack.len() > 1,
            "environment stack underflow: pop without a matching push"
        );
        let popped = stack.pop().expect("len checked above");
        tracing::debug!(depth = stack.len(), "environment popped");
        popped
    }

    /// Number of environments on the stack, base included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }
}

impl std::fmt::Debug for EnvironmentStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentStack")
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ErrorEnvelope;
    use crate::models::{Comment, CommentTarget, Playlist, Project};
    use crate::service::Service;
    use brook_core::Source;

    struct StubService;

    impl Service for StubService {
        fn playlists(&self) -> Source<Vec<Playlist>, ErrorEnvelope> {
            Source::value(Vec::new())
        }
        fn project_for(&self, _playlist: &Playlist) -> Source<Project, ErrorEnvelope> {
            Source::failed(ErrorEnvelope::http(404))
        }
        fn post_comment(&self, _body: &str, _target: &CommentTarget) -> Source<Comment, ErrorEnvelope> {
            Source::failed(ErrorEnvelope::http(404))
        }
    }

    fn env(locale: &str) -> Rc<Environment> {
        Environment::builder(Rc::new(StubService)).locale(locale).build()
    }

    #[test]
    fn current_is_the_most_recent_push() {
        let stack = EnvironmentStack::new(env("en-US"));
        assert_eq!(stack.current().locale, "en-US");

        stack.push(env("fr-FR"));
        assert_eq!(stack.current().locale, "fr-FR");
        stack.push(env("de-DE"));
        assert_eq!(stack.current().locale, "de-DE");

        stack.pop();
        assert_eq!(stack.current().locale, "fr-FR");
        stack.pop();
        assert_eq!(stack.current().locale, "en-US");
    }

    #[test]
    #[should_panic(expected = "environment stack underflow")]
    fn popping_the_base_panics() {
        let stack = EnvironmentStack::new(env("en-US"));
        stack.pop();
    }

    #[test]
    fn depth_counts_the_base() {
        let stack = EnvironmentStack::new(env("en-US"));
        assert_eq!(stack.depth(), 1);
        stack.push(env("fr-FR"));
        assert_eq!(stack.depth(), 2);
    }
}
