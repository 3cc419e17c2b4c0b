//! JSON responses for the submission endpoint.
//!
//! Every outcome, success or failure, has the same envelope:
//! `{success, message}` plus `submissionId` on 200 and `retryAfter` on 429.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::submission::{Accepted, SubmissionError};

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully! Your automation has been triggered.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "submissionId", skip_serializing_if = "Option::is_none", default)]
    pub submission_id: Option<String>,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none", default)]
    pub retry_after: Option<u64>,
}

impl SubmitResponse {
    pub fn accepted(accepted: Accepted) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            submission_id: Some(accepted.submission_id),
            retry_after: None,
        }
    }

    pub fn failed(err: &SubmissionError) -> Self {
        Self {
            success: false,
            message: err.public_message(),
            submission_id: None,
            retry_after: err.retry_after(),
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), Json(SubmitResponse::failed(&self))).into_response();

        if let Some(secs) = self.retry_after() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}
