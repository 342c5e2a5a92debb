//! Error taxonomy for the monitor
//!
//! Every failure carries its kind so the caller of the scheduler can decide
//! what to do with it. Only report failures are absorbed by the scheduler
//! itself; everything else stops it.

use thiserror::Error;

/// Coarse classification of a [`MonitorError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Fetch,
    Parse,
    Division,
    Report,
}

#[derive(Error, Debug)]
pub enum MonitorError {
    /// Missing or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Usage endpoint unreachable, timed out, or answered with a failure status
    #[error("Unable to reach usage endpoint {endpoint}: {reason}")]
    Fetch { endpoint: String, reason: String },

    /// Usage endpoint body is not a valid usage snapshot
    #[error("Unable to parse usage JSON from {endpoint}: {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Capacity of zero leaves the percentage undefined
    #[error("Capacity is zero ({available} available), availability is undefined")]
    Division { available: i64 },

    /// Dashboard POST could not be sent or was rejected
    #[error("Unable to report metric to {url}: {reason}")]
    Report { url: String, reason: String },
}

impl MonitorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MonitorError::Config(_) => ErrorKind::Config,
            MonitorError::Fetch { .. } => ErrorKind::Fetch,
            MonitorError::Parse { .. } => ErrorKind::Parse,
            MonitorError::Division { .. } => ErrorKind::Division,
            MonitorError::Report { .. } => ErrorKind::Report,
        }
    }

    /// Returns true if the error must stop the sampling loop.
    ///
    /// Report failures are tolerated: the next tick still runs. Every other
    /// kind terminates the monitor.
    pub fn is_fatal(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Report)
    }
}
