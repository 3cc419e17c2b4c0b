use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;
use crate::http::server::AppState;

/// Characters of the upstream URL shown before masking.
pub const URL_PREVIEW_CHARS: usize = 50;

/// Presence flags for the settings an operator usually gets wrong.
/// Secrets are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigReport {
    #[serde(rename = "hasUpstreamUrl")]
    pub has_upstream_url: bool,
    #[serde(rename = "hasUpstreamToken")]
    pub has_upstream_token: bool,
    #[serde(rename = "allowedOrigin")]
    pub allowed_origin: String,
    pub port: u16,
    #[serde(rename = "upstreamUrlMasked")]
    pub upstream_url_masked: String,
}

impl ConfigReport {
    pub fn from_config(config: &RelayConfig) -> Self {
        let upstream_url_masked = match &config.upstream.url {
            Some(url) => {
                let preview: String = url.chars().take(URL_PREVIEW_CHARS).collect();
                format!("{}...", preview)
            }
            None => "NOT SET".to_string(),
        };

        Self {
            has_upstream_url: config.upstream.url.is_some(),
            has_upstream_token: config.upstream.token.is_some(),
            allowed_origin: config.cors.allowed_origin.clone(),
            port: config.listener.port,
            upstream_url_masked,
        }
    }
}

/// `GET /debug/config`.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigReport> {
    Json(ConfigReport::from_config(&state.config))
}
