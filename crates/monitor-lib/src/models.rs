//! Core data models for the capacity monitor

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capacity state of a resource pool at a point in time
///
/// Each entry in `hosts` is itself a full snapshot, so the value is a tree
/// of arbitrary depth. Every node owns its children; snapshots are never
/// mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub available: i64,
    pub capacity: i64,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub hosts: BTreeMap<String, UsageSnapshot>,
}

impl UsageSnapshot {
    /// Parse a snapshot from a raw JSON response body
    ///
    /// Nesting depth of `hosts` is not limited; the stack grows on demand
    /// instead of hitting serde_json's recursion limit.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let mut json = serde_json::Deserializer::from_slice(body);
        json.disable_recursion_limit();

        let snapshot = Self::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;

        Ok(snapshot)
    }

    /// Number of nested hosts at every depth below this node
    pub fn host_count(&self) -> usize {
        self.hosts
            .values()
            .map(|host| 1 + host.host_count())
            .sum()
    }
}

/// Timestamped availability value pushed to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Availability percentage
    pub value: f64,
}

impl MetricSample {
    /// Stamp a value with the current time
    pub fn now(value: f64) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp(),
            value,
        }
    }
}

/// Wire envelope for the metrics API: `{"data": {"timestamp": .., "value": ..}}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricPayload {
    pub data: MetricSample,
}

impl From<MetricSample> for MetricPayload {
    fn from(data: MetricSample) -> Self {
        Self { data }
    }
}
