//! Shared HTTP client construction

use crate::error::MonitorError;
use reqwest::Client;
use std::time::Duration;

/// Identifying user-agent sent with every request
pub(crate) const USER_AGENT: &str = concat!("capacity-monitor/", env!("CARGO_PKG_VERSION"));

/// Build a client that opens a fresh connection for every request.
///
/// Idle pooling is disabled so nothing is held open between ticks.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, MonitorError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|e| MonitorError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Render a reqwest failure with its transport cause
pub(crate) fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
