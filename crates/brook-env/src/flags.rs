#![forbid(unsafe_code)]

//! Feature gating. Unknown flags read as disabled.

use std::collections::HashMap;

/// Named boolean gates, immutable once the environment is built.
#[derive(Debug, Clone, Default)]
pub struct FeatureFlags {
    flags: HashMap<String, bool>,
}

impl FeatureFlags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(name.into(), enabled);
        self
    }

    /// Whether `name` is enabled; unknown flags are disabled.
    #[must_use]
    pub fn enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}
