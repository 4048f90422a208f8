#![forbid(unsafe_code)]

//! Analytics event sink as a capability. The engine only emits; hosts
//! decide where events go.

/// Event sink for behavioral analytics.
pub trait Analytics {
    /// Record one event with string properties.
    fn track(&self, event: &str, properties: &[(&str, String)]);
}

/// Discards every event. The default collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl Analytics for NoopAnalytics {
    fn track(&self, _event: &str, _properties: &[(&str, String)]) {}
}
