//! SSL Labs API client.
//!
//! Requests the `analyze` report for a host and polls it until SSL Labs marks
//! it final (`READY` or `ERROR`). The raw body of the final report is handed
//! to the pipeline untouched.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use super::types::ScanReport;
use crate::config::Config;

/// Errors raised while fetching a scan report.
#[derive(Error, Debug)]
pub enum ScanClientError {
    /// Network or protocol failure talking to the scan API.
    #[error("scan API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The scan API answered with a non-success status.
    #[error("scan API returned HTTP {0}")]
    Status(u16),

    /// The body is not a scan report.
    #[error("scan API returned an unreadable report: {0}")]
    Decode(String),

    /// Polling stopped before the report became final.
    #[error("scan for {domain} is still '{status}'")]
    NotFinal { domain: String, status: String },
}

/// Polling client for the SSL Labs `analyze` endpoint.
#[derive(Clone)]
pub struct ScanClient {
    client: Arc<reqwest::Client>,
    api_url: String,
    max_polls: usize,
    poll_interval: Duration,
}

impl ScanClient {
    /// Creates a client for `api_url` (the API base, e.g. `https://api.ssllabs.com/api/v3`).
    pub fn new(
        client: Arc<reqwest::Client>,
        api_url: impl Into<String>,
        max_polls: usize,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            max_polls: max_polls.max(1),
            poll_interval,
        }
    }

    /// Creates a client from the scan settings of `config`.
    pub fn from_config(client: Arc<reqwest::Client>, config: &Config) -> Self {
        Self::new(
            client,
            config.scan_api_url.clone(),
            config.scan_max_polls,
            Duration::from_millis(config.scan_poll_interval_ms),
        )
    }

    /// Fetches the final scan report for `domain` as raw JSON.
    ///
    /// Only in-progress reports are polled again; request, HTTP status and
    /// decode failures are returned immediately.
    ///
    /// # Errors
    ///
    /// Returns `ScanClientError::NotFinal` if the report is still in progress
    /// after the configured number of polls.
    pub async fn fetch_report(&self, domain: &str) -> Result<String, ScanClientError> {
        let strategy = FixedInterval::new(self.poll_interval).take(self.max_polls - 1);
        RetryIf::spawn(
            strategy,
            || self.poll_once(domain),
            |e: &ScanClientError| {
                let retry = matches!(e, ScanClientError::NotFinal { .. });
                if retry {
                    log::debug!("{}; polling again", e);
                }
                retry
            },
        )
        .await
    }

    async fn poll_once(&self, domain: &str) -> Result<String, ScanClientError> {
        let url = format!("{}/analyze", self.api_url);
        let response = self
            .client
            .get(&url)
            .query(&[("host", domain), ("all", "done")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Scan API returned {} for {}", status, domain);
            return Err(ScanClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let report: ScanReport =
            serde_json::from_str(&body).map_err(|e| ScanClientError::Decode(e.to_string()))?;

        if !report.scan_status().is_final() {
            return Err(ScanClientError::NotFinal {
                domain: domain.to_string(),
                status: report.status,
            });
        }

        log::info!("Scan report for {} is {}", domain, report.status);
        Ok(body)
    }
}
