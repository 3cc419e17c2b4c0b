//! The submission pipeline.
//!
//! ```text
//! Received → admission → validation → sanitization → forwarding → outcome
//! ```
//! The first failing step ends the request; nothing is retried.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::config::schema::non_blank;
use crate::config::{RateLimitConfig, UpstreamConfig};
use crate::observability::SubmissionEvents;
use crate::security::{Admission, Decision};
use crate::submission::error::SubmissionError;
use crate::submission::types::{Accepted, SubmissionInput, UpstreamPayload};
use crate::submission::validation::{mask_email, validate};
use crate::upstream::{Forwarder, UpstreamTarget};

/// Upstream error bodies are cut to this many characters before logging.
pub const ERROR_EXCERPT_CHARS: usize = 200;

/// Prefix of identifiers generated when the upstream does not return one.
pub const FALLBACK_ID_PREFIX: &str = "sub_";

/// Admission policy applied to every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 5,
        }
    }
}

impl From<&RateLimitConfig> for RateLimitPolicy {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            window_ms: config.window_ms,
            max_requests: config.max_requests,
        }
    }
}

/// Validates, rate-limits and relays form submissions.
pub struct SubmissionService {
    limiter: Arc<dyn Admission>,
    forwarder: Arc<dyn Forwarder>,
    events: Arc<dyn SubmissionEvents>,
    policy: RateLimitPolicy,
    upstream_url: Option<String>,
    upstream_token: Option<String>,
}

impl SubmissionService {
    pub fn new(
        limiter: Arc<dyn Admission>,
        forwarder: Arc<dyn Forwarder>,
        events: Arc<dyn SubmissionEvents>,
        policy: RateLimitPolicy,
        upstream: &UpstreamConfig,
    ) -> Self {
        Self {
            limiter,
            forwarder,
            events,
            policy,
            upstream_url: non_blank(upstream.url.clone()),
            upstream_token: non_blank(upstream.token.clone()),
        }
    }

    /// Run one submission from `client_id` with the raw request body.
    pub async fn handle(&self, client_id: &str, body: &[u8]) -> Result<Accepted, SubmissionError> {
        let result = self.process(client_id, body).await;

        if let Err(SubmissionError::Unexpected(message)) = &result {
            self.events.failed(message, &timestamp());
        }

        result
    }

    async fn process(&self, client_id: &str, body: &[u8]) -> Result<Accepted, SubmissionError> {
        let decision = self
            .limiter
            .admit(client_id, self.policy.window_ms, self.policy.max_requests);
        if let Decision::Rejected { retry_after_secs } = decision {
            self.events.rate_limited(client_id, retry_after_secs);
            return Err(SubmissionError::RateLimited { retry_after_secs });
        }

        let input = SubmissionInput::from_body(body);
        let form = validate(&input).inspect_err(|e| {
            self.events.validation_failed(client_id, &e.to_string());
        })?;

        let target = self.target()?;

        let masked = mask_email(form.email());
        let payload = UpstreamPayload::new(form, timestamp());
        self.events.received(&masked, client_id, &payload.submission_time);

        let reply = self
            .forwarder
            .forward(&target, &payload)
            .await
            .map_err(|e| SubmissionError::Unexpected(e.to_string()))?;

        if !reply.is_success() {
            self.events
                .upstream_rejected(reply.status, &excerpt(&reply.body, ERROR_EXCERPT_CHARS));
            return Err(SubmissionError::Upstream { status: reply.status });
        }

        let result: Value = serde_json::from_str(&reply.body).map_err(|e| {
            SubmissionError::Unexpected(format!("invalid JSON from upstream: {}", e))
        })?;

        let submission_id = submission_id_from(&result).unwrap_or_else(fallback_submission_id);
        self.events.forwarded(&masked, &timestamp());

        Ok(Accepted { submission_id })
    }

    fn target(&self) -> Result<UpstreamTarget, SubmissionError> {
        let missing = match (&self.upstream_url, &self.upstream_token) {
            (Some(url), Some(token)) => {
                return Ok(UpstreamTarget {
                    url: url.clone(),
                    token: token.clone(),
                })
            }
            (None, Some(_)) => "url",
            (Some(_), None) => "token",
            (None, None) => "url and token",
        };

        self.events.config_missing(missing);
        Err(SubmissionError::Config(missing))
    }
}

/// Current instant as ISO-8601 UTC with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `sub_<ms since epoch>`.
pub fn fallback_submission_id() -> String {
    format!("{}{}", FALLBACK_ID_PREFIX, Utc::now().timestamp_millis())
}

/// Take a non-empty string or non-zero number from the upstream `id`.
fn submission_id_from(result: &Value) -> Option<String> {
    match result.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn excerpt(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
