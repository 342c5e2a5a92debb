//! Capacity availability monitor library
//!
//! This crate provides the core functionality for:
//! - Fetching capacity snapshots from a usage-stats endpoint
//! - Deriving an availability percentage from a snapshot
//! - Reporting the percentage to the status-page metrics API
//! - Driving the fetch/compute/report cycle on a fixed period

pub mod availability;
pub mod error;
pub mod fetcher;
mod http;
pub mod models;
pub mod observability;
pub mod reporter;
pub mod scheduler;

pub use availability::compute_availability;
pub use error::{ErrorKind, MonitorError};
pub use fetcher::{FetcherConfig, UsageFetcher, UsageSource};
pub use models::*;
pub use observability::StructuredLogger;
pub use reporter::{MetricReporter, MetricSink, ReporterConfig, DEFAULT_API_BASE};
pub use scheduler::{SamplingScheduler, SamplingSchedulerBuilder, TickOutcome};
