//! Metric reporting to the status-page metrics API

use crate::error::MonitorError;
use crate::http;
use crate::models::{MetricPayload, MetricSample};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Base URL of the hosted status-page API
pub const DEFAULT_API_BASE: &str = "https://api.statuspage.io/v1/";

/// Destination for availability samples
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Transmit one sample. Fails with a Report error.
    async fn report(&self, sample: &MetricSample) -> Result<(), MonitorError>;
}

/// Credentials and identifiers for the dashboard service
#[derive(Clone)]
pub struct ReporterConfig {
    pub api_key: String,
    pub page_id: String,
    pub metric_id: String,
    /// API root; always ends with `/`
    pub api_base: Url,
    pub request_timeout: Duration,
}

impl ReporterConfig {
    pub fn new(
        api_key: impl Into<String>,
        page_id: impl Into<String>,
        metric_id: impl Into<String>,
    ) -> Result<Self, MonitorError> {
        let api_base = Url::parse(DEFAULT_API_BASE).map_err(|e| {
            MonitorError::Config(format!("Invalid API base {}: {}", DEFAULT_API_BASE, e))
        })?;

        Ok(Self {
            api_key: api_key.into(),
            page_id: page_id.into(),
            metric_id: metric_id.into(),
            api_base,
            request_timeout: Duration::from_secs(30),
        })
    }

    /// Point the reporter at a different API root
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, MonitorError> {
        let normalized = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{}/", api_base)
        };
        self.api_base = Url::parse(&normalized)
            .map_err(|e| MonitorError::Config(format!("Invalid API base {}: {}", api_base, e)))?;
        Ok(self)
    }

    /// `{api_base}pages/{page_id}/metrics/{metric_id}/data.json`
    pub fn metric_url(&self) -> Result<Url, MonitorError> {
        self.api_base
            .join(&format!(
                "pages/{}/metrics/{}/data.json",
                self.page_id, self.metric_id
            ))
            .map_err(|e| MonitorError::Config(format!("Invalid metric URL: {}", e)))
    }
}

impl fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterConfig")
            .field("api_key", &"<redacted>")
            .field("page_id", &self.page_id)
            .field("metric_id", &self.metric_id)
            .field("api_base", &self.api_base.as_str())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// HTTP implementation of [`MetricSink`]
pub struct MetricReporter {
    client: Client,
    url: Url,
    authorization: String,
}

impl MetricReporter {
    pub fn new(config: &ReporterConfig) -> Result<Self, MonitorError> {
        Ok(Self {
            client: http::build_client(config.request_timeout)?,
            url: config.metric_url()?,
            authorization: format!("OAuth {}", config.api_key),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn report_error(&self, reason: String) -> MonitorError {
        MonitorError::Report {
            url: self.url.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl MetricSink for MetricReporter {
    async fn report(&self, sample: &MetricSample) -> Result<(), MonitorError> {
        let body = serde_json::to_vec(&MetricPayload::from(*sample))
            .map_err(|e| self.report_error(format!("failed to encode payload: {}", e)))?;

        debug!(
            url = %self.url,
            body = %String::from_utf8_lossy(&body),
            "Posting metric sample"
        );

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| self.report_error(http::describe(&e)))?;

        let status = response.status();
        let response_body = response.text().await.unwrap_or_default();

        self.check_response(status, &response_body)
    }
}

impl MetricReporter {
    /// Accept 2xx responses; anything else is a report failure
    fn check_response(&self, status: StatusCode, body: &str) -> Result<(), MonitorError> {
        if !status.is_success() {
            warn!(
                event = "metric_rejected",
                status = status.as_u16(),
                body = %body,
                "Metrics API rejected sample"
            );
            return Err(self.report_error(format!("status {}: {}", status, body)));
        }

        info!(
            event = "metric_reported",
            status = status.as_u16(),
            body = %body,
            "Metrics API accepted sample"
        );
        Ok(())
    }
}
