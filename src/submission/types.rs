//! Submission data as it moves through the pipeline.

use serde::Serialize;
use serde_json::Value;

/// `source` tag sent with every relayed submission.
pub const WEB_FORM_SOURCE: &str = "web-form";

/// Untrusted form fields exactly as the client sent them.
///
/// Fields keep their raw JSON value so type mismatches can be reported
/// the same way as missing fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionInput {
    pub full_name: Option<Value>,
    pub email: Option<Value>,
}

impl SubmissionInput {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: Some(Value::String(full_name.into())),
            email: Some(Value::String(email.into())),
        }
    }

    /// Read `fullName` and `email` from a request body. Anything other
    /// than a JSON object yields an input with neither field.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut map)) => Self {
                full_name: map.remove("fullName"),
                email: map.remove("email"),
            },
            _ => Self::default(),
        }
    }
}

/// Trimmed, capped and format-checked form fields.
///
/// Only `validation::validate` builds one, so holding a value proves both
/// fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedSubmission {
    #[serde(rename = "fullName")]
    full_name: String,
    email: String,
}

impl SanitizedSubmission {
    pub(super) fn new(full_name: String, email: String) -> Self {
        Self { full_name, email }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Wire body posted to the upstream API.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamPayload {
    #[serde(rename = "formData")]
    pub form_data: SanitizedSubmission,
    #[serde(rename = "submissionTime")]
    pub submission_time: String,
    pub source: String,
}

impl UpstreamPayload {
    pub fn new(form_data: SanitizedSubmission, submission_time: String) -> Self {
        Self {
            form_data,
            submission_time,
            source: WEB_FORM_SOURCE.to_string(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// A submission the upstream accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub submission_id: String,
}
