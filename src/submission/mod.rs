//! Form submission handling.
//!
//! # Data Flow
//! ```text
//! raw body + client identifier
//!     → service.rs (admission via security::rate_limit)
//!     → types.rs (SubmissionInput from JSON body)
//!     → validation.rs (presence → sanitize → format)
//!     → upstream::Forwarder (single POST)
//!     → Accepted | SubmissionError
//! ```
//!
//! # Design Decisions
//! - Each step returns a `Result`; the first failure is final
//! - Caller-facing text comes from `SubmissionError::public_message`;
//!   upstream bodies and missing-setting names are only logged

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

pub use error::SubmissionError;
pub use service::{RateLimitPolicy, SubmissionService};
pub use types::{Accepted, SanitizedSubmission, SubmissionInput, UpstreamPayload, WEB_FORM_SOURCE};
pub use validation::ValidationError;
