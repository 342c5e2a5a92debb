//! Usage snapshot retrieval from the usage-stats endpoint

use crate::error::MonitorError;
use crate::http;
use crate::models::UsageSnapshot;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Source of usage snapshots
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Retrieve the current snapshot. Fails with a Fetch or Parse error.
    async fn fetch(&self) -> Result<UsageSnapshot, MonitorError>;

    /// Endpoint label used in log events
    fn endpoint(&self) -> &str;
}

/// Endpoint and cadence for sampling
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Absolute URL of the usage-stats endpoint
    pub endpoint: Url,
    /// Interval between scheduler ticks
    pub period: Duration,
    /// Timeout for a single GET
    pub request_timeout: Duration,
}

impl FetcherConfig {
    pub fn new(endpoint: Url, period: Duration) -> Self {
        Self {
            endpoint,
            period,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP implementation of [`UsageSource`]
pub struct UsageFetcher {
    client: Client,
    endpoint: Url,
}

impl UsageFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, MonitorError> {
        Ok(Self {
            client: http::build_client(config.request_timeout)?,
            endpoint: config.endpoint.clone(),
        })
    }

    fn fetch_error(&self, reason: String) -> MonitorError {
        MonitorError::Fetch {
            endpoint: self.endpoint.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl UsageSource for UsageFetcher {
    async fn fetch(&self) -> Result<UsageSnapshot, MonitorError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| self.fetch_error(http::describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.fetch_error(format!("unexpected status {}", status)));
        }

        let body = response.bytes().await.map_err(|e| {
            self.fetch_error(format!("failed to read body: {}", http::describe(&e)))
        })?;

        debug!(endpoint = %self.endpoint, bytes = body.len(), "Fetched usage snapshot");

        UsageSnapshot::from_json(&body).map_err(|source| MonitorError::Parse {
            endpoint: self.endpoint.to_string(),
            source,
        })
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}
