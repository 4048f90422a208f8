#![forbid(unsafe_code)]

//! Ready-made test environments and scoped substitution.

use std::rc::Rc;
use std::time::Duration;

use brook_core::TestScheduler;
use brook_env::{CurrentUser, Environment, EnvironmentStack, User};

use crate::analytics::RecordingAnalytics;
use crate::mock_service::MockService;

/// A fully wired test environment plus handles to its mutable collaborators.
pub struct TestEnvironment {
    pub env: Rc<Environment>,
    pub scheduler: TestScheduler,
    pub service: Rc<MockService>,
    pub analytics: RecordingAnalytics,
    pub current_user: CurrentUser,
}

/// Environment on a virtual clock with canned collaborators: default
/// [`MockService`], recording analytics, logged out, 1.2s debounce.
#[must_use]
pub fn test_environment() -> TestEnvironment {
    test_environment_with(MockService::new())
}

/// Same as [`test_environment`], with a caller-configured service.
#[must_use]
pub fn test_environment_with(service: MockService) -> TestEnvironment {
    let scheduler = TestScheduler::new();
    let service = Rc::new(service);
    let analytics = RecordingAnalytics::new();
    let current_user = CurrentUser::logged_out();
    let env = Environment::builder(Rc::clone(&service) as Rc<dyn brook_env::Service>)
        .scheduler(scheduler.handle())
        .analytics(Rc::new(analytics.clone()))
        .current_user(current_user.clone())
        .build();
    TestEnvironment {
        env,
        scheduler,
        service,
        analytics,
        current_user,
    }
}

/// A plausible logged-in identity for tests.
#[must_use]
pub fn test_user() -> User {
    User {
        id: 42,
        name: "Blob".to_string(),
    }
}

/// The engine-wide default focus debounce, for test arithmetic.
pub const DEBOUNCE: Duration = brook_env::DEFAULT_DEBOUNCE_INTERVAL;

/// Run `body` with `env` pushed onto `stack`, popping on every exit path.
///
/// The pop happens in a drop guard, so a panicking body still restores the
/// previous environment before the panic propagates.
pub fn with_environment<R>(
    stack: &EnvironmentStack,
    env: Rc<Environment>,
    body: impl FnOnce(&Rc<Environment>) -> R,
) -> R {
    struct PopGuard<'a>(&'a EnvironmentStack);
    impl Drop for PopGuard<'_> {
        fn drop(&mut self) {
            self.0.pop();
        }
    }

    stack.push(env);
    let guard = PopGuard(stack);
    let current = guard.0.current();
    body(&current)
}
