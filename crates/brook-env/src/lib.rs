#![forbid(unsafe_code)]

//! Environment bundle and collaborator capabilities.
//!
//! View-models depend on the outside world only through the capability
//! traits defined here ([`Service`], [`StringTable`], [`Analytics`]) plus
//! observable session identity ([`CurrentUser`]). One [`Environment`]
//! bundles a coherent set of collaborators; tests substitute any of them by
//! building a new environment ([`EnvironmentStack`] gives the harness a
//! scoped way to do so).

pub mod analytics;
pub mod current_user;
pub mod envelope;
pub mod environment;
pub mod flags;
pub mod models;
pub mod service;
pub mod stack;
pub mod strings;

pub use analytics::{Analytics, NoopAnalytics};
pub use current_user::CurrentUser;
pub use envelope::{ErrorEnvelope, GENERIC_ERROR_MESSAGE, user_facing_message};
pub use environment::{DEFAULT_DEBOUNCE_INTERVAL, Environment, EnvironmentBuilder};
pub use flags::FeatureFlags;
pub use models::{Comment, CommentTarget, Playlist, Project, Update, User};
pub use service::Service;
pub use stack::EnvironmentStack;
pub use strings::{IdentityStrings, KeyedStrings, StringTable};
