//! Liveness endpoint.
//!
//! The relay has no dependencies worth probing at request time; the
//! upstream is only contacted on submission, so liveness is process-level.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::submission::service::timestamp;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

/// `GET /health`.
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: timestamp(),
    })
}
