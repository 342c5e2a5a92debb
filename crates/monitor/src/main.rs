//! Capacity Monitor - availability reporter for pooled-resource services
//!
//! Samples a usage-stats endpoint on a fixed period and pushes the
//! availability percentage to a status-page metric.

use anyhow::Result;
use monitor_lib::{MetricReporter, SamplingSchedulerBuilder, StructuredLogger, UsageFetcher};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

const MONITOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting capacity-monitor");

    let config = config::MonitorConfig::load()?;
    info!(reporter = ?config.reporter, "Monitor configured");

    let fetcher = Arc::new(UsageFetcher::new(&config.fetcher)?);
    let reporter = Arc::new(MetricReporter::new(&config.reporter)?);

    let logger = StructuredLogger::new(config.fetcher.endpoint.as_str());
    logger.log_startup(MONITOR_VERSION, config.fetcher.period, reporter.url());

    let scheduler = SamplingSchedulerBuilder::new()
        .source(fetcher)
        .sink(reporter)
        .period(config.fetcher.period)
        .build()?;

    // Only fired on Ctrl-C; otherwise the loop runs until a fatal error
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let mut sampling = tokio::spawn(scheduler.run(shutdown_rx));

    let result = tokio::select! {
        result = &mut sampling => result?,
        _ = tokio::signal::ctrl_c() => {
            let _ = shutdown_tx.send(());
            let result = sampling.await?;
            if let Ok(ticks) = &result {
                logger.log_shutdown("SIGINT received", *ticks);
            }
            result
        }
    };

    if let Err(e) = &result {
        logger.log_fatal(e);
    }

    result?;
    Ok(())
}
