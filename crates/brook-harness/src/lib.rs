#![forbid(unsafe_code)]

//! Test harness: event-recording observers, mock collaborators, and scoped
//! environment substitution. Not published; depended on as a dev-dependency
//! by the crates it tests.

pub mod analytics;
pub mod env;
pub mod mock_service;
pub mod observer;

pub use analytics::{RecordingAnalytics, TrackedEvent};
pub use env::{DEBOUNCE, TestEnvironment, test_environment, test_environment_with, test_user, with_environment};
pub use mock_service::MockService;
pub use observer::TestObserver;
