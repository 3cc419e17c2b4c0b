//! Input validation and sanitization.
//!
//! Presence checks run on the raw input; format checks run on the
//! sanitized values, so `"  Jane@Example.COM  "` is accepted as
//! `jane@example.com`.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::submission::types::{SanitizedSubmission, SubmissionInput};

/// Fields are capped to this many characters after trimming.
pub const MAX_FIELD_CHARS: usize = 100;

pub const MIN_NAME_CHARS: usize = 2;

/// Why a submission was refused. The display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required.")]
    MissingEmail,

    #[error("Full name is required (minimum 2 characters).")]
    MissingName,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Full name contains invalid characters.")]
    InvalidName,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

fn name_pattern() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[a-zA-Z\s\-'.]+$").expect("name pattern is valid"))
}

fn mask_pattern() -> &'static Regex {
    static MASK: OnceLock<Regex> = OnceLock::new();
    MASK.get_or_init(|| Regex::new(r"(.{2}).*@").expect("mask pattern is valid"))
}

/// Check presence, sanitize, then check format.
pub fn validate(input: &SubmissionInput) -> Result<SanitizedSubmission, ValidationError> {
    let email = match &input.email {
        Some(Value::String(email)) if !email.is_empty() => email,
        _ => return Err(ValidationError::MissingEmail),
    };

    let full_name = match &input.full_name {
        Some(Value::String(name)) if name.trim().chars().count() >= MIN_NAME_CHARS => name,
        _ => return Err(ValidationError::MissingName),
    };

    let full_name = sanitize_name(full_name);
    let email = sanitize_email(email);

    if !email_pattern().is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !name_pattern().is_match(&full_name) {
        return Err(ValidationError::InvalidName);
    }

    Ok(SanitizedSubmission::new(full_name, email))
}

/// Trim and cap. Idempotent.
pub fn sanitize_name(raw: &str) -> String {
    cap(raw.trim()).trim_end().to_string()
}

/// Trim, lower-case and cap. Idempotent.
pub fn sanitize_email(raw: &str) -> String {
    cap(&raw.trim().to_lowercase()).trim_end().to_string()
}

fn cap(value: &str) -> &str {
    match value.char_indices().nth(MAX_FIELD_CHARS) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Keep the first two characters of the local part: `jane@x.com` → `ja***@x.com`.
pub fn mask_email(email: &str) -> String {
    mask_pattern().replacen(email, 1, "${1}***@").into_owned()
}
