use metrics::{counter, gauge};

/// Metrics collector for the live-delivery layer
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "crew_ws" }
    }

    /// Record new connection established
    pub fn connection_established(&self, namespace: &str) {
        counter!(format!("{}.connections.established", self.prefix), "namespace" => namespace.to_string()).increment(1);
        gauge!(format!("{}.connections.active", self.prefix), "namespace" => namespace.to_string()).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self, namespace: &str, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix), "namespace" => namespace.to_string(), "reason" => reason.to_string()).increment(1);
        gauge!(format!("{}.connections.active", self.prefix), "namespace" => namespace.to_string()).decrement(1.0);
    }

    /// Record event received from a client
    pub fn event_received(&self, namespace: &str, kind: &str) {
        counter!(format!("{}.events.received", self.prefix), "namespace" => namespace.to_string(), "kind" => kind.to_string()).increment(1);
    }

    /// Record event delivered to a client
    pub fn event_delivered(&self, namespace: &str, kind: &str) {
        counter!(format!("{}.events.delivered", self.prefix), "namespace" => namespace.to_string(), "kind" => kind.to_string()).increment(1);
    }

    /// Record event dropped without delivery
    pub fn event_dropped(&self, namespace: &str, reason: &str) {
        counter!(format!("{}.events.dropped", self.prefix), "namespace" => namespace.to_string(), "reason" => reason.to_string()).increment(1);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_type)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
