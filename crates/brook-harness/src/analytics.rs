#![forbid(unsafe_code)]

//! Event-recording analytics sink.

use std::cell::RefCell;
use std::rc::Rc;

use brook_env::Analytics;

/// One recorded analytics event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEvent {
    pub name: String,
    pub properties: Vec<(String, String)>,
}

/// Records every tracked event for assertion.
///
/// Clones share the same log; hand one clone to the environment and keep
/// another for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    events: Rc<RefCell<Vec<TrackedEvent>>>,
}

impl RecordingAnalytics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.borrow().clone()
    }

    /// Names of tracked events, in order.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|e| e.name.clone()).collect()
    }
}

impl Analytics for RecordingAnalytics {
    fn track(&self, event: &str, properties: &[(&str, String)]) {
        self.events.borrow_mut().push(TrackedEvent {
            name: event.to_string(),
            properties: properties
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_event_log() {
        let recorder = RecordingAnalytics::new();
        let handle = recorder.clone();
        handle.track("viewed", &[("screen", "feed".to_string())]);

        assert_eq!(recorder.event_names(), vec!["viewed".to_string()]);
        assert_eq!(
            recorder.events()[0].properties,
            vec![("screen".to_string(), "feed".to_string())]
        );
    }
}
