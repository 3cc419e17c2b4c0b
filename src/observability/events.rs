//! Submission event sink.
//!
//! The submission pipeline reports what happened through this trait
//! instead of logging directly, so handlers stay free of output concerns
//! and tests can swap in a silent or recording sink. Emails reaching this
//! layer are already masked.

/// Observability hooks fired by the submission pipeline.
pub trait SubmissionEvents: Send + Sync {
    fn rate_limited(&self, client_id: &str, retry_after_secs: u64);

    fn validation_failed(&self, client_id: &str, reason: &str);

    /// `missing` names the absent setting; it never reaches the caller.
    fn config_missing(&self, missing: &str);

    fn received(&self, masked_email: &str, client_id: &str, at: &str);

    fn forwarded(&self, masked_email: &str, at: &str);

    /// Upstream answered with a non-success status. `body_excerpt` is
    /// already truncated.
    fn upstream_rejected(&self, status: u16, body_excerpt: &str);

    fn failed(&self, message: &str, at: &str);
}

/// Default sink writing structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl SubmissionEvents for TracingEvents {
    fn rate_limited(&self, client_id: &str, retry_after_secs: u64) {
        tracing::warn!(client = %client_id, retry_after_secs, "Rate limit exceeded");
    }

    fn validation_failed(&self, client_id: &str, reason: &str) {
        tracing::debug!(client = %client_id, reason, "Submission rejected");
    }

    fn config_missing(&self, missing: &str) {
        tracing::error!(missing, "Missing upstream API configuration");
    }

    fn received(&self, masked_email: &str, client_id: &str, at: &str) {
        tracing::info!(email = %masked_email, timestamp = %at, client = %client_id, "Form submission received");
    }

    fn forwarded(&self, masked_email: &str, at: &str) {
        tracing::info!(email = %masked_email, timestamp = %at, "Successfully triggered integration");
    }

    fn upstream_rejected(&self, status: u16, body_excerpt: &str) {
        tracing::error!(status, error = %body_excerpt, "Upstream API error");
    }

    fn failed(&self, message: &str, at: &str) {
        tracing::error!(error = %message, timestamp = %at, "Form submission error");
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl SubmissionEvents for NoopEvents {
    fn rate_limited(&self, _: &str, _: u64) {}
    fn validation_failed(&self, _: &str, _: &str) {}
    fn config_missing(&self, _: &str) {}
    fn received(&self, _: &str, _: &str, _: &str) {}
    fn forwarded(&self, _: &str, _: &str) {}
    fn upstream_rejected(&self, _: u16, _: &str) {}
    fn failed(&self, _: &str, _: &str) {}
}
