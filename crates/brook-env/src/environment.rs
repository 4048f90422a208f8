#![forbid(unsafe_code)]

//! The immutable collaborator bundle handed to view-models.
//!
//! An [`Environment`] is assembled once through [`EnvironmentBuilder`] and
//! never mutated; swapping a collaborator means building a new environment
//! (the harness stack does exactly that). View-model constructors take
//! `&Rc<Environment>` explicitly — there is no ambient global.

use std::rc::Rc;
use std::time::Duration;

use brook_core::{Scheduler, SystemScheduler};

use crate::analytics::{Analytics, NoopAnalytics};
use crate::current_user::CurrentUser;
use crate::flags::FeatureFlags;
use crate::service::Service;
use crate::strings::{IdentityStrings, StringTable};

/// Quiet period a focus must survive before it commits.
pub const DEFAULT_DEBOUNCE_INTERVAL: Duration = Duration::from_millis(1200);

/// Everything a view-model needs from the outside world.
pub struct Environment {
    pub service: Rc<dyn Service>,
    pub current_user: CurrentUser,
    pub scheduler: Rc<dyn Scheduler>,
    pub debounce_interval: Duration,
    pub locale: String,
    pub time_zone: String,
    pub country_code: String,
    pub strings: Rc<dyn StringTable>,
    pub analytics: Rc<dyn Analytics>,
    pub feature_flags: FeatureFlags,
}

impl Environment {
    /// Builder with defaults: wall-clock scheduler, 1.2s debounce, en-US /
    /// UTC / US, empty string table, discarded analytics, logged out.
    pub fn builder(service: Rc<dyn Service>) -> EnvironmentBuilder {
        EnvironmentBuilder::new(service)
    }

    /// Resolve a collaborator failure to its user-facing string.
    #[must_use]
    pub fn error_message(&self, envelope: &crate::envelope::ErrorEnvelope) -> String {
        crate::envelope::user_facing_message(envelope, self.strings.as_ref())
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("locale", &self.locale)
            .field("time_zone", &self.time_zone)
            .field("country_code", &self.country_code)
            .field("debounce_interval", &self.debounce_interval)
            .field("logged_in", &self.current_user.is_logged_in())
            .finish()
    }
}

/// Override-what-you-need construction for [`Environment`].
pub struct EnvironmentBuilder {
    service: Rc<dyn Service>,
    current_user: CurrentUser,
    scheduler: Rc<dyn Scheduler>,
    debounce_interval: Duration,
    locale: String,
    time_zone: String,
    country_code: String,
    strings: Rc<dyn StringTable>,
    analytics: Rc<dyn Analytics>,
    feature_flags: FeatureFlags,
}

impl EnvironmentBuilder {
    pub fn new(service: Rc<dyn Service>) -> Self {
        Self {
            service,
            current_user: CurrentUser::logged_out(),
            scheduler: Rc::new(SystemScheduler::new()),
            debounce_interval: DEFAULT_DEBOUNCE_INTERVAL,
            locale: "en-US".to_string(),
            time_zone: "UTC".to_string(),
            country_code: "US".to_string(),
            strings: Rc::new(IdentityStrings),
            analytics: Rc::new(NoopAnalytics),
            feature_flags: FeatureFlags::default(),
        }
    }

    #[must_use]
    pub fn current_user(mut self, current_user: CurrentUser) -> Self {
        self.current_user = current_user;
        self
    }

    #[must_use]
    pub fn scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    #[must_use]
    pub fn debounce_interval(mut self, interval: Duration) -> Self {
        self.debounce_interval = interval;
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    #[must_use]
    pub fn country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    #[must_use]
    pub fn strings(mut self, strings: Rc<dyn StringTable>) -> Self {
        self.strings = strings;
        self
    }

    #[must_use]
    pub fn analytics(mut self, analytics: Rc<dyn Analytics>) -> Self {
        self.analytics = analytics;
        self
    }

    #[must_use]
    pub fn feature_flags(mut self, feature_flags: FeatureFlags) -> Self {
        self.feature_flags = feature_flags;
        self
    }

    #[must_use]
    pub fn build(self) -> Rc<Environment> {
        Rc::new(Environment {
            service: self.service,
            current_user: self.current_user,
            scheduler: self.scheduler,
            debounce_interval: self.debounce_interval,
            locale: self.locale,
            time_zone: self.time_zone,
            country_code: self.country_code,
            strings: self.strings,
            analytics: self.analytics,
            feature_flags: self.feature_flags,
        })
    }
}
