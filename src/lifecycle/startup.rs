//! Startup orchestration.
//!
//! Order: metrics exporter → upstream client → listener → serve. Any
//! failure here is fatal; missing upstream credentials are not a failure.

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] UpstreamError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Bring the relay up and serve until `shutdown` fires.
pub async fn run(config: RelayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    if config.upstream.url.is_none() || config.upstream.token.is_none() {
        tracing::warn!(
            has_url = config.upstream.url.is_some(),
            has_token = config.upstream.token.is_some(),
            "Upstream API not fully configured; submissions will fail"
        );
    }

    let address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(address = %address, "Form available at http://{}", address);

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
