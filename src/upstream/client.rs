//! HTTP client for the upstream automation API.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::submission::types::UpstreamPayload;

/// User agent sent on every relayed submission.
pub const USER_AGENT: &str = "FormProxy/1.0";

/// Resolved upstream endpoint and credentials.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    pub url: String,
    pub token: String,
}

/// Status and raw body of an upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Request(reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Request(e)
        }
    }
}

/// Delivers a payload to the upstream API.
///
/// A non-success status is a normal reply, not an error; errors are
/// reserved for transport failures.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(
        &self,
        target: &UpstreamTarget,
        payload: &UpstreamPayload,
    ) -> Result<UpstreamReply, UpstreamError>;
}

/// `reqwest`-backed forwarder.
#[derive(Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
}

impl HttpForwarder {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(
        &self,
        target: &UpstreamTarget,
        payload: &UpstreamPayload,
    ) -> Result<UpstreamReply, UpstreamError> {
        let start = Instant::now();

        let response = self
            .client
            .post(&target.url)
            .bearer_auth(&target.token)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        metrics::record_upstream_call(status, start);
        tracing::debug!(status, elapsed_ms = start.elapsed().as_millis() as u64, "Upstream responded");

        Ok(UpstreamReply { status, body })
    }
}
