#![forbid(unsafe_code)]

//! Session identity as observable state.

use brook_core::{Never, Signal, Source, StateCell};

use crate::models::User;

/// Readable, writable, observable session identity.
///
/// Clones share the same underlying cell; an environment and its harness
/// overrides see one identity.
#[derive(Clone)]
pub struct CurrentUser {
    cell: StateCell<Option<User>>,
}

impl Default for CurrentUser {
    fn default() -> Self {
        Self::logged_out()
    }
}

impl CurrentUser {
    #[must_use]
    pub fn logged_out() -> Self {
        Self {
            cell: StateCell::new(None),
        }
    }

    #[must_use]
    pub fn logged_in(user: User) -> Self {
        Self {
            cell: StateCell::new(Some(user)),
        }
    }

    pub fn log_in(&self, user: User) {
        tracing::debug!(user_id = user.id, "user logged in");
        self.cell.write(Some(user));
    }

    pub fn log_out(&self) {
        tracing::debug!("user logged out");
        self.cell.write(None);
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.cell.read()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.cell.with(Option::is_some)
    }

    /// Future identity changes, no replay.
    #[must_use]
    pub fn changes(&self) -> Signal<Option<User>, Never> {
        self.cell.signal()
    }

    /// Property stream: current identity on start, then changes.
    #[must_use]
    pub fn producer(&self) -> Source<Option<User>, Never> {
        self.cell.producer()
    }
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}
