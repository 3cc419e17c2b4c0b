//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, CORS, body limit)
//! - Serve the static form
//! - Bind server to listener and drain on shutdown
//! - Run the rate limit sweeper alongside the server

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::{CorsConfig, RelayConfig};
use crate::health;
use crate::http::request::{peer_addr, propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::SubmitResponse;
use crate::observability::{metrics, TracingEvents};
use crate::security::rate_limit::{spawn_sweeper, SlidingWindowLimiter};
use crate::security::client_identifier;
use crate::submission::{RateLimitPolicy, SubmissionError, SubmissionService};
use crate::upstream::{HttpForwarder, UpstreamError};

pub const SUBMIT_PATH: &str = "/api/submit-form";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub submissions: Arc<SubmissionService>,
    pub config: Arc<RelayConfig>,
}

/// HTTP server for the form relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
    limiter: Arc<SlidingWindowLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamError> {
        let config = Arc::new(config);
        let limiter = Arc::new(SlidingWindowLimiter::new());
        let forwarder = Arc::new(HttpForwarder::new(&config.upstream)?);

        let submissions = Arc::new(SubmissionService::new(
            limiter.clone(),
            forwarder,
            Arc::new(TracingEvents),
            RateLimitPolicy::from(&config.rate_limit),
            &config.upstream,
        ));

        let state = AppState {
            submissions,
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            limiter,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut api = Router::new()
            .route(SUBMIT_PATH, post(submit_form))
            .route("/health", get(health::health_check));

        if config.debug.expose_config {
            api = api.merge(admin::debug_router());
        }

        let mut router = api.with_state(state);

        if config.static_files.enabled {
            let root = PathBuf::from(&config.static_files.root);
            router = router
                .route_service("/", ServeFile::new(root.join(&config.static_files.index)))
                .fallback_service(ServeDir::new(root));
        }

        router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(cors_layer(&config.cors))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Router with all middleware, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let rate_limit = &self.config.rate_limit;
        if rate_limit.sweep_interval_secs > 0 {
            spawn_sweeper(
                self.limiter.clone(),
                rate_limit.window_ms,
                Duration::from_secs(rate_limit.sweep_interval_secs),
                shutdown.resubscribe(),
            );
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let origin = config.allowed_origin.trim();
    if origin == "*" {
        return base.allow_origin(Any);
    }

    match HeaderValue::from_str(origin) {
        Ok(value) => base.allow_origin(value).allow_credentials(true),
        Err(_) => {
            tracing::warn!(origin = %origin, "Invalid allowed origin, allowing any");
            base.allow_origin(Any)
        }
    }
}

/// `POST /api/submit-form`.
async fn submit_form(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();
    let client_id = client_identifier(&parts.headers, peer_addr(&parts.extensions));

    let result = match axum::body::to_bytes(body, state.config.security.max_body_size).await {
        Ok(bytes) => state.submissions.handle(&client_id, &bytes).await,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            Err(SubmissionError::Unexpected(format!("failed to read request body: {}", e)))
        }
    };

    match result {
        Ok(accepted) => {
            metrics::record_submission("success");
            tracing::debug!(request_id = %request_id, client = %client_id, "Submission relayed");
            (StatusCode::OK, Json(SubmitResponse::accepted(accepted))).into_response()
        }
        Err(err) => {
            metrics::record_submission(err.outcome());
            if err.retry_after().is_some() {
                metrics::record_rate_limited();
            }
            tracing::debug!(
                request_id = %request_id,
                client = %client_id,
                status = err.status_code().as_u16(),
                error = %err,
                "Submission failed"
            );
            err.into_response()
        }
    }
}
