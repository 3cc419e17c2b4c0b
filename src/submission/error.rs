//! Terminal failure states of a submission.

use axum::http::StatusCode;
use thiserror::Error;

use crate::submission::validation::ValidationError;

pub const CONFIG_ERROR_MESSAGE: &str = "Server configuration error. Please contact administrator.";
pub const UPSTREAM_ERROR_MESSAGE: &str = "Failed to process your request. Please try again later.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Everything that can end a submission short of success.
///
/// The `Display` text is for logs. Callers only ever see
/// [`SubmissionError::public_message`].
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("upstream {0} is not configured")]
    Config(&'static str),

    #[error("upstream responded with status {status}")]
    Upstream { status: u16 },

    #[error("{0}")]
    Unexpected(String),
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Config(_)
            | SubmissionError::Upstream { .. }
            | SubmissionError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            SubmissionError::RateLimited { retry_after_secs } => format!(
                "Too many requests. Please try again in {} seconds.",
                retry_after_secs
            ),
            SubmissionError::Validation(e) => e.to_string(),
            SubmissionError::Config(_) => CONFIG_ERROR_MESSAGE.to_string(),
            SubmissionError::Upstream { .. } => UPSTREAM_ERROR_MESSAGE.to_string(),
            SubmissionError::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            SubmissionError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            SubmissionError::RateLimited { .. } => "rate_limited",
            SubmissionError::Validation(_) => "validation_failed",
            SubmissionError::Config(_) => "config_error",
            SubmissionError::Upstream { .. } => "upstream_error",
            SubmissionError::Unexpected(_) => "unexpected_error",
        }
    }
}
