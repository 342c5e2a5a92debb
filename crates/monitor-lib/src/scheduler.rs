//! Sampling scheduler
//!
//! Runs fetch → compute → report once immediately and then once per period
//! until shutdown is signalled or a fatal error occurs. Ticks never overlap:
//! the next tick is only awaited once the current one has finished.

use crate::availability::compute_availability;
use crate::error::MonitorError;
use crate::fetcher::UsageSource;
use crate::models::MetricSample;
use crate::observability::StructuredLogger;
use crate::reporter::MetricSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Result of a tick that did not hit a fatal error
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Sample accepted by the sink
    Reported(MetricSample),
    /// Sink rejected the sample; the loop carries on
    ReportFailed(MetricSample),
}

impl TickOutcome {
    pub fn sample(&self) -> &MetricSample {
        match self {
            TickOutcome::Reported(sample) | TickOutcome::ReportFailed(sample) => sample,
        }
    }
}

/// Fixed-period driver for the sampling pipeline
pub struct SamplingScheduler {
    source: Arc<dyn UsageSource>,
    sink: Arc<dyn MetricSink>,
    period: Duration,
    logger: StructuredLogger,
}

impl SamplingScheduler {
    /// Create a new scheduler. The period must be non-zero.
    pub fn new(
        source: Arc<dyn UsageSource>,
        sink: Arc<dyn MetricSink>,
        period: Duration,
    ) -> Result<Self, MonitorError> {
        if period.is_zero() {
            return Err(MonitorError::Config(
                "Sampling period must be greater than zero".to_string(),
            ));
        }

        let logger = StructuredLogger::new(source.endpoint());

        Ok(Self {
            source,
            sink,
            period,
            logger,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run until `shutdown` fires (or its sender is dropped).
    ///
    /// Returns the number of completed ticks on shutdown. The first fatal
    /// error ends the loop and is returned to the caller; report failures
    /// are logged and do not.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<u64, MonitorError> {
        info!(
            period_secs = self.period.as_secs(),
            endpoint = %self.source.endpoint(),
            "Starting sampling loop"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = 0u64;

        loop {
            // Shutdown is checked before a tick is started
            tokio::select! {
                biased;

                _ = shutdown.recv() => {
                    info!(ticks = ticks, "Shutting down sampling loop");
                    break;
                }
                _ = ticker.tick() => {
                    let start = Instant::now();

                    let outcome = self.tick().await?;

                    ticks += 1;
                    debug!(
                        tick = ticks,
                        value = outcome.sample().value,
                        reported = matches!(outcome, TickOutcome::Reported(_)),
                        elapsed_ms = start.elapsed().as_millis(),
                        "Tick complete"
                    );
                }
            }
        }

        Ok(ticks)
    }

    /// Perform one fetch → compute → report cycle
    pub async fn tick(&self) -> Result<TickOutcome, MonitorError> {
        let snapshot = self.source.fetch().await?;
        let availability = compute_availability(&snapshot)?;
        self.logger.log_availability(&snapshot, availability);

        let sample = MetricSample::now(availability);

        match self.sink.report(&sample).await {
            Ok(()) => Ok(TickOutcome::Reported(sample)),
            Err(e) if !e.is_fatal() => {
                self.logger.log_report_failure(&e);
                Ok(TickOutcome::ReportFailed(sample))
            }
            Err(e) => Err(e),
        }
    }
}

/// Builder for creating the sampling scheduler
pub struct SamplingSchedulerBuilder {
    source: Option<Arc<dyn UsageSource>>,
    sink: Option<Arc<dyn MetricSink>>,
    period: Duration,
}

impl SamplingSchedulerBuilder {
    /// Create a new builder with a 60 second period
    pub fn new() -> Self {
        Self {
            source: None,
            sink: None,
            period: Duration::from_secs(60),
        }
    }

    /// Set the usage source
    pub fn source(mut self, source: Arc<dyn UsageSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the metric sink
    pub fn sink(mut self, sink: Arc<dyn MetricSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the sampling period
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Build the scheduler
    pub fn build(self) -> Result<SamplingScheduler, MonitorError> {
        let source = self
            .source
            .ok_or_else(|| MonitorError::Config("Usage source is required".to_string()))?;
        let sink = self
            .sink
            .ok_or_else(|| MonitorError::Config("Metric sink is required".to_string()))?;

        SamplingScheduler::new(source, sink, self.period)
    }
}

impl Default for SamplingSchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
