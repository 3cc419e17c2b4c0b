//! Client identification for rate limiting.
//!
//! Priority: `X-Forwarded-For` (leftmost entry), `X-Real-IP`, peer address,
//! then the literal `"unknown"`. Proxy headers are trusted as-is; the relay
//! is expected to sit behind a proxy that sets them.

use axum::http::HeaderMap;
use std::net::SocketAddr;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the identifier rate-limit state is keyed by.
pub fn client_identifier(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    let real_ip = headers
        .get(X_REAL_IP)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = real_ip {
        return ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("192.0.2.7:51234".parse().unwrap())
    }

    #[test]
    fn test_forwarded_for_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_identifier(&headers, peer()), "203.0.113.9");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static(" "));
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_identifier(&headers, peer()), "198.51.100.2");
    }

    #[test]
    fn test_peer_address_fallback() {
        assert_eq!(client_identifier(&HeaderMap::new(), peer()), "192.0.2.7");
    }

    #[test]
    fn test_unknown_without_any_source() {
        assert_eq!(client_identifier(&HeaderMap::new(), None), UNKNOWN_CLIENT);
    }
}
