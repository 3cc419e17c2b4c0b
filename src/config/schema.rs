//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the form relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Upstream automation API settings.
    pub upstream: UpstreamConfig,

    /// Per-client admission policy.
    pub rate_limit: RateLimitConfig,

    /// Cross-origin settings for the browser form.
    pub cors: CorsConfig,

    /// Static form serving.
    pub static_files: StaticFilesConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Diagnostic endpoints.
    pub debug: DebugConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by `PORT`.
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Upstream automation API.
///
/// `url` and `token` are optional on purpose: a relay without them still
/// starts and answers submissions with a configuration error.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Endpoint receiving forwarded submissions.
    pub url: Option<String>,

    /// Bearer token sent in the `Authorization` header.
    pub token: Option<String>,

    /// Total time allowed for the upstream call, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl UpstreamConfig {
    /// Treat blank `url`/`token` values as unset.
    pub fn clear_blank_credentials(&mut self) {
        self.url = non_blank(self.url.take());
        self.token = non_blank(self.token.take());
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Length of the sliding window in milliseconds.
    pub window_ms: u64,

    /// Admitted submissions per client within one window.
    pub max_requests: u32,

    /// How often idle clients are dropped from memory, in seconds (0 = never).
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 5,
            sweep_interval_secs: 300,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origin, or "*" for any.
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Serve the form and its assets.
    pub enabled: bool,

    /// Directory holding `index.html` and assets.
    pub root: String,

    /// File served at `/`.
    pub index: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: "public".to_string(),
            index: "index.html".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 16 * 1024, // 16KB
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    /// Mount `GET /debug/config`.
    pub expose_config: bool,
}
