//! Structured JSON logging for monitor events
//!
//! Every significant event is emitted through tracing with an `event` field
//! so the JSON output can be filtered without parsing messages.

use crate::error::MonitorError;
use crate::models::UsageSnapshot;
use std::time::Duration;
use tracing::{error, info, warn};

/// Structured logger for monitor events
#[derive(Clone)]
pub struct StructuredLogger {
    endpoint: String,
}

impl StructuredLogger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Log monitor startup
    pub fn log_startup(&self, version: &str, period: Duration, metric_url: &str) {
        info!(
            event = "monitor_started",
            endpoint = %self.endpoint,
            monitor_version = %version,
            period_secs = period.as_secs(),
            metric_url = %metric_url,
            "Capacity monitor started"
        );
    }

    /// Log a computed availability
    pub fn log_availability(&self, snapshot: &UsageSnapshot, availability: f64) {
        info!(
            event = "availability_sampled",
            endpoint = %self.endpoint,
            available = snapshot.available,
            capacity = snapshot.capacity,
            version = %snapshot.version,
            hosts = snapshot.host_count(),
            availability = availability,
            "{} availability {}%",
            self.endpoint,
            availability
        );
    }

    /// Log a tolerated report failure
    pub fn log_report_failure(&self, err: &MonitorError) {
        warn!(
            event = "report_failed",
            endpoint = %self.endpoint,
            error = %err,
            "Failed to report availability, continuing with next tick"
        );
    }

    /// Log the error that stopped the monitor
    pub fn log_fatal(&self, err: &MonitorError) {
        error!(
            event = "monitor_failed",
            endpoint = %self.endpoint,
            kind = ?err.kind(),
            error = %err,
            "Capacity monitor stopped on fatal error"
        );
    }

    /// Log monitor shutdown
    pub fn log_shutdown(&self, reason: &str, ticks: u64) {
        info!(
            event = "monitor_shutdown",
            endpoint = %self.endpoint,
            reason = %reason,
            ticks = ticks,
            "Capacity monitor shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("http://tmpnb:9000/stats");
        assert_eq!(logger.endpoint(), "http://tmpnb:9000/stats");
    }
}
