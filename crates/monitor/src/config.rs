//! Monitor configuration
//!
//! Read once at startup from two environment prefixes: `STATUS_PAGE_*` for
//! the dashboard credentials and `TMPNB_STATS_*` for the usage endpoint.

use monitor_lib::{FetcherConfig, MonitorError, ReporterConfig, DEFAULT_API_BASE};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Dashboard settings as found in the environment
#[derive(Debug, Clone, Deserialize)]
struct StatusPageSettings {
    api_key: String,
    page_id: String,
    #[serde(alias = "tmpnb_metric_id")]
    metric_id: String,
    #[serde(default = "default_api_base")]
    api_base: String,
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
}

/// Usage endpoint settings as found in the environment
#[derive(Debug, Clone, Deserialize)]
struct UsageStatsSettings {
    endpoint: String,
    /// Sampling period in seconds
    period: u64,
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Validated monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub reporter: ReporterConfig,
    pub fetcher: FetcherConfig,
}

impl MonitorConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, MonitorError> {
        Self::from_sources(
            config::Environment::with_prefix("STATUS_PAGE"),
            config::Environment::with_prefix("TMPNB_STATS"),
        )
    }

    fn from_sources(
        status_page: config::Environment,
        usage_stats: config::Environment,
    ) -> Result<Self, MonitorError> {
        let status_page: StatusPageSettings = read_section(status_page, "STATUS_PAGE")?;
        let usage_stats: UsageStatsSettings = read_section(usage_stats, "TMPNB_STATS")?;

        Ok(Self {
            reporter: build_reporter(status_page)?,
            fetcher: build_fetcher(usage_stats)?,
        })
    }
}

fn read_section<T: serde::de::DeserializeOwned>(
    source: config::Environment,
    prefix: &str,
) -> Result<T, MonitorError> {
    config::Config::builder()
        .add_source(source)
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| MonitorError::Config(format!("{}_*: {}", prefix, e)))
}

fn require(value: String, name: &str) -> Result<String, MonitorError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MonitorError::Config(format!("{} must not be empty", name)));
    }
    Ok(trimmed.to_string())
}

fn positive_secs(secs: u64, name: &str) -> Result<Duration, MonitorError> {
    if secs == 0 {
        return Err(MonitorError::Config(format!("{} must be greater than zero", name)));
    }
    Ok(Duration::from_secs(secs))
}

fn build_reporter(settings: StatusPageSettings) -> Result<ReporterConfig, MonitorError> {
    let mut reporter = ReporterConfig::new(
        require(settings.api_key, "STATUS_PAGE_API_KEY")?,
        require(settings.page_id, "STATUS_PAGE_PAGE_ID")?,
        require(settings.metric_id, "STATUS_PAGE_TMPNB_METRIC_ID")?,
    )?
    .with_api_base(&settings.api_base)?;

    reporter.request_timeout = positive_secs(
        settings.request_timeout_secs,
        "STATUS_PAGE_REQUEST_TIMEOUT_SECS",
    )?;

    Ok(reporter)
}

fn build_fetcher(settings: UsageStatsSettings) -> Result<FetcherConfig, MonitorError> {
    let raw = require(settings.endpoint, "TMPNB_STATS_ENDPOINT")?;
    let endpoint = Url::parse(&raw)
        .map_err(|e| MonitorError::Config(format!("TMPNB_STATS_ENDPOINT {}: {}", raw, e)))?;

    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(MonitorError::Config(format!(
            "TMPNB_STATS_ENDPOINT must be an http(s) URL, got {}",
            raw
        )));
    }

    let period = positive_secs(settings.period, "TMPNB_STATS_PERIOD")?;
    let mut fetcher = FetcherConfig::new(endpoint, period);
    fetcher.request_timeout = positive_secs(
        settings.request_timeout_secs,
        "TMPNB_STATS_REQUEST_TIMEOUT_SECS",
    )?;

    Ok(fetcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_lib::ErrorKind;

    fn env(prefix: &str, vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        config::Environment::with_prefix(prefix).source(Some(map))
    }

    fn status_page(vars: &[(&str, &str)]) -> config::Environment {
        env("STATUS_PAGE", vars)
    }

    fn usage_stats(vars: &[(&str, &str)]) -> config::Environment {
        env("TMPNB_STATS", vars)
    }

    const STATUS_PAGE_VARS: &[(&str, &str)] = &[
        ("STATUS_PAGE_API_KEY", "key-abc"),
        ("STATUS_PAGE_PAGE_ID", "page123"),
        ("STATUS_PAGE_TMPNB_METRIC_ID", "metric456"),
    ];

    const USAGE_VARS: &[(&str, &str)] = &[
        ("TMPNB_STATS_ENDPOINT", "http://tmpnb:9000/stats"),
        ("TMPNB_STATS_PERIOD", "30"),
    ];

    #[test]
    fn test_load_complete_config() {
        let config =
            MonitorConfig::from_sources(status_page(STATUS_PAGE_VARS), usage_stats(USAGE_VARS))
                .unwrap();

        assert_eq!(config.reporter.api_key, "key-abc");
        assert_eq!(config.reporter.page_id, "page123");
        assert_eq!(config.reporter.metric_id, "metric456");
        assert_eq!(config.reporter.api_base.as_str(), DEFAULT_API_BASE);
        assert_eq!(config.fetcher.endpoint.as_str(), "http://tmpnb:9000/stats");
        assert_eq!(config.fetcher.period, Duration::from_secs(30));
        assert_eq!(config.fetcher.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_plain_metric_id_name() {
        let config = MonitorConfig::from_sources(
            status_page(&[
                ("STATUS_PAGE_API_KEY", "k"),
                ("STATUS_PAGE_PAGE_ID", "p"),
                ("STATUS_PAGE_METRIC_ID", "m"),
                ("STATUS_PAGE_API_BASE", "http://localhost:4010/v1"),
            ]),
            usage_stats(USAGE_VARS),
        )
        .unwrap();

        assert_eq!(config.reporter.metric_id, "m");
        assert_eq!(
            config.reporter.metric_url().unwrap().as_str(),
            "http://localhost:4010/v1/pages/p/metrics/m/data.json"
        );
    }

    #[test]
    fn test_missing_api_key() {
        let err = MonitorConfig::from_sources(
            status_page(&[
                ("STATUS_PAGE_PAGE_ID", "p"),
                ("STATUS_PAGE_TMPNB_METRIC_ID", "m"),
            ]),
            usage_stats(USAGE_VARS),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_blank_page_id() {
        let err = MonitorConfig::from_sources(
            status_page(&[
                ("STATUS_PAGE_API_KEY", "k"),
                ("STATUS_PAGE_PAGE_ID", "  "),
                ("STATUS_PAGE_TMPNB_METRIC_ID", "m"),
            ]),
            usage_stats(USAGE_VARS),
        )
        .unwrap_err();

        assert!(err.to_string().contains("STATUS_PAGE_PAGE_ID"));
    }

    #[test]
    fn test_zero_period() {
        let err = MonitorConfig::from_sources(
            status_page(STATUS_PAGE_VARS),
            usage_stats(&[
                ("TMPNB_STATS_ENDPOINT", "http://tmpnb:9000/stats"),
                ("TMPNB_STATS_PERIOD", "0"),
            ]),
        )
        .unwrap_err();

        assert!(err.to_string().contains("TMPNB_STATS_PERIOD"));
    }

    #[test]
    fn test_non_numeric_period() {
        let result = MonitorConfig::from_sources(
            status_page(STATUS_PAGE_VARS),
            usage_stats(&[
                ("TMPNB_STATS_ENDPOINT", "http://tmpnb:9000/stats"),
                ("TMPNB_STATS_PERIOD", "often"),
            ]),
        );

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_relative_endpoint() {
        let result = MonitorConfig::from_sources(
            status_page(STATUS_PAGE_VARS),
            usage_stats(&[
                ("TMPNB_STATS_ENDPOINT", "/stats"),
                ("TMPNB_STATS_PERIOD", "30"),
            ]),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_usage_section() {
        let result = MonitorConfig::from_sources(status_page(STATUS_PAGE_VARS), usage_stats(&[]));

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
    }
}
