//! Page lifecycle bookkeeping fed by CDP events.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Tracks in-flight network requests of one page.
///
/// The page counts as settled once no request has been in flight for the
/// configured quiet period.
#[derive(Debug)]
pub struct NetworkTracker {
    in_flight: HashSet<String>,
    last_activity: Instant,
}

impl Default for NetworkTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkTracker {
    pub fn new() -> Self {
        Self {
            in_flight: HashSet::new(),
            last_activity: Instant::now(),
        }
    }

    /// Apply one `Network.*` event. Unrelated events are ignored.
    pub fn on_event(&mut self, method: &str, params: &Value) {
        let Some(request_id) = params.get("requestId").and_then(Value::as_str) else {
            return;
        };

        match method {
            "Network.requestWillBeSent" => {
                self.in_flight.insert(request_id.to_string());
            }
            "Network.loadingFinished" | "Network.loadingFailed" => {
                self.in_flight.remove(request_id);
            }
            _ => return,
        }
        self.last_activity = Instant::now();
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether nothing has been in flight for at least `quiet`.
    pub fn is_idle(&self, quiet: Duration) -> bool {
        self.in_flight.is_empty() && self.last_activity.elapsed() >= quiet
    }

    /// Restart the quiet period, e.g. after dispatching input.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Forget requests of a document that is being replaced.
    pub fn reset(&mut self) {
        self.in_flight.clear();
        self.last_activity = Instant::now();
    }
}

/// Lifecycle state shared between the event pump and the session.
#[derive(Debug, Default)]
pub(crate) struct PageLifecycle {
    pub(crate) network: NetworkTracker,
    dom_content_loaded: u64,
}

impl PageLifecycle {
    pub(crate) fn on_event(&mut self, method: &str, params: &Value) {
        match method {
            "Page.domContentEventFired" => self.dom_content_loaded += 1,
            m if m.starts_with("Network.") => self.network.on_event(m, params),
            _ => {}
        }
    }

    /// Number of documents that reached DOMContentLoaded so far.
    pub(crate) fn dom_content_loaded(&self) -> u64 {
        self.dom_content_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fresh_tracker_idle_after_quiet_period() {
        let tracker = NetworkTracker::new();
        assert!(tracker.is_idle(Duration::ZERO));
        assert!(!tracker.is_idle(Duration::from_secs(60)));
    }

    #[test]
    fn test_request_lifecycle() {
        let mut tracker = NetworkTracker::new();
        tracker.on_event("Network.requestWillBeSent", &json!({"requestId": "1"}));
        tracker.on_event("Network.requestWillBeSent", &json!({"requestId": "2"}));
        assert_eq!(tracker.in_flight(), 2);
        assert!(!tracker.is_idle(Duration::ZERO));

        tracker.on_event("Network.loadingFinished", &json!({"requestId": "1"}));
        tracker.on_event("Network.loadingFailed", &json!({"requestId": "2"}));
        assert_eq!(tracker.in_flight(), 0);
        assert!(tracker.is_idle(Duration::ZERO));
    }

    #[test]
    fn test_redirect_reuses_request_id() {
        let mut tracker = NetworkTracker::new();
        tracker.on_event("Network.requestWillBeSent", &json!({"requestId": "7"}));
        tracker.on_event("Network.requestWillBeSent", &json!({"requestId": "7"}));
        assert_eq!(tracker.in_flight(), 1);
        tracker.on_event("Network.loadingFinished", &json!({"requestId": "7"}));
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_unrelated_events_ignored() {
        let mut tracker = NetworkTracker::new();
        tracker.on_event("Network.responseReceived", &json!({"requestId": "1"}));
        tracker.on_event("Network.requestWillBeSent", &json!({}));
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_activity_restarts_quiet_period() {
        let mut tracker = NetworkTracker::new();
        std::thread::sleep(Duration::from_millis(30));
        assert!(tracker.is_idle(Duration::from_millis(20)));

        tracker.on_event("Network.requestWillBeSent", &json!({"requestId": "1"}));
        tracker.on_event("Network.loadingFinished", &json!({"requestId": "1"}));
        assert!(!tracker.is_idle(Duration::from_millis(20)));
    }

    #[test]
    fn test_touch_restarts_quiet_period() {
        let mut tracker = NetworkTracker::new();
        std::thread::sleep(Duration::from_millis(30));
        tracker.touch();
        assert!(!tracker.is_idle(Duration::from_millis(20)));
        assert!(tracker.is_idle(Duration::ZERO));
    }

    #[test]
    fn test_reset_clears_in_flight() {
        let mut tracker = NetworkTracker::new();
        tracker.on_event("Network.requestWillBeSent", &json!({"requestId": "1"}));
        tracker.reset();
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_lifecycle_counts_dom_content() {
        let mut lifecycle = PageLifecycle::default();
        lifecycle.on_event("Page.domContentEventFired", &json!({"timestamp": 1.0}));
        lifecycle.on_event("Network.requestWillBeSent", &json!({"requestId": "1"}));
        assert_eq!(lifecycle.dom_content_loaded(), 1);
        assert_eq!(lifecycle.network.in_flight(), 1);
    }
}
