//! Typed client for the form relay's public HTTP API.

mod client;

pub use client::{HealthResponse, RelayClient, SubmitRequest, SubmitResponse};
