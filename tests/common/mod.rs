//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use form_relay::{HttpServer, RelayConfig, Shutdown};

/// A request the mock upstream received.
#[derive(Debug, Clone)]
pub struct Captured {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: &'static str,
    seen: Arc<Mutex<Vec<Captured>>>,
}

/// Mock automation API answering every POST with a fixed status and body.
pub struct MockUpstream {
    pub url: String,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub async fn start(status: u16, reply: &'static str) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status: StatusCode::from_u16(status).unwrap(),
            reply,
            seen: seen.clone(),
        };

        let app = Router::new().route("/hook", post(capture)).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/hook", addr),
            seen,
        }
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }
}

async fn capture(State(state): State<MockState>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);
    state.seen.lock().unwrap().push(Captured { headers, body });
    (state.status, state.reply.to_string())
}

/// Relay config pointing at `upstream_url` with static files off.
pub fn relay_config(upstream_url: Option<&str>) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.upstream.url = upstream_url.map(str::to_string);
    config.upstream.token = upstream_url.map(|_| "test-token".to_string());
    config.static_files.enabled = false;
    config.rate_limit.sweep_interval_secs = 0;
    config
}

/// A relay serving on an ephemeral port.
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningRelay {
    pub async fn start(config: RelayConfig) -> Self {
        let server = HttpServer::new(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();

        tokio::spawn(async move {
            server.run(listener, rx).await.unwrap();
        });

        Self { addr, shutdown }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
