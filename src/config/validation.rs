//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Missing upstream
//! credentials are not an error here; the submission handler reports them
//! per request.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("listener address {0} is not a valid socket address")]
    BindAddress(String),

    #[error("upstream.url is not an absolute http(s) URL: {0}")]
    UpstreamUrl(String),

    #[error("cors.allowed_origin is not a valid origin: {0}")]
    AllowedOrigin(String),

    #[error("observability.metrics_address is not a valid socket address: {0}")]
    MetricsAddress(String),

    #[error("timeouts.request_secs ({request_secs}) must exceed upstream.timeout_secs ({upstream_secs})")]
    TimeoutOrder { request_secs: u64, upstream_secs: u64 },
}

pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let non_zero = [
        ("rate_limit.window_ms", config.rate_limit.window_ms),
        ("rate_limit.max_requests", u64::from(config.rate_limit.max_requests)),
        ("upstream.timeout_secs", config.upstream.timeout_secs),
        ("upstream.connect_timeout_secs", config.upstream.connect_timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("security.max_body_size", config.security.max_body_size as u64),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    let bind = config.listener.bind_address();
    if bind.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(bind));
    }

    if let Some(raw) = config.upstream.url.as_ref().filter(|u| !u.trim().is_empty()) {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            _ => errors.push(ValidationError::UpstreamUrl(raw.clone())),
        }
    }

    // The request timeout must outlast the upstream call.
    let (request_secs, upstream_secs) = (config.timeouts.request_secs, config.upstream.timeout_secs);
    if request_secs > 0 && upstream_secs > 0 && request_secs <= upstream_secs {
        errors.push(ValidationError::TimeoutOrder {
            request_secs,
            upstream_secs,
        });
    }

    let origin = config.cors.allowed_origin.trim();
    if origin != "*" && HeaderValue::from_str(origin).is_err() {
        errors.push(ValidationError::AllowedOrigin(config.cors.allowed_origin.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_missing_credentials_are_not_errors() {
        let config = RelayConfig::default();
        assert!(config.upstream.url.is_none());
        assert!(config.upstream.token.is_none());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayConfig::default();
        config.rate_limit.max_requests = 0;
        config.upstream.timeout_secs = 0;
        config.upstream.url = Some("ftp://files.example.com".into());
        config.cors.allowed_origin = "https://bad\norigin".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero { field: "rate_limit.max_requests" }));
        assert!(errors.contains(&ValidationError::Zero { field: "upstream.timeout_secs" }));
    }

    #[test]
    fn test_relative_upstream_url_rejected() {
        let mut config = RelayConfig::default();
        config.upstream.url = Some("/api/hook".into());
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::UpstreamUrl("/api/hook".into())]
        );
    }

    #[test]
    fn test_blank_upstream_url_is_not_an_error() {
        let mut config = RelayConfig::default();
        config.upstream.url = Some("   ".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_request_timeout_must_exceed_upstream_timeout() {
        let mut config = RelayConfig::default();
        config.upstream.timeout_secs = 30;
        config.timeouts.request_secs = 30;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::TimeoutOrder {
                request_secs: 30,
                upstream_secs: 30
            }]
        );

        config.timeouts.request_secs = 31;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_host_rejected() {
        let mut config = RelayConfig::default();
        config.listener.host = "not a host".into();
        assert!(matches!(
            validate_config(&config).unwrap_err()[0],
            ValidationError::BindAddress(_)
        ));
    }
}
