//! Form submission relay.
//!
//! Accepts a web form submission, rate-limits the submitting client,
//! validates and sanitizes the fields, and forwards them to a single
//! upstream automation API.

pub mod admin;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod submission;
pub mod upstream;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use submission::SubmissionService;
