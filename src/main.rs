//! Form relay server.
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 FORM RELAY                   │
//!   POST /api/submit-form │  ┌──────────┐   ┌────────────┐   ┌────────┐  │
//!   ──────────────────────┼─▶│  client  │──▶│ rate limit │──▶│validate│  │
//!                         │  │    id    │   │  (window)  │   │sanitize│  │
//!                         │  └──────────┘   └─────┬──────┘   └───┬────┘  │
//!                         │                       │ 429          ▼       │
//!   JSON response         │  ┌──────────┐         │         ┌─────────┐  │
//!   ◀─────────────────────┼──│ response │◀────────┴─────────│upstream │──┼──▶ Automation
//!                         │  │ mapping  │◀──────────────────│ client  │◀─┼─── API
//!                         │  └──────────┘                   └─────────┘  │
//!                         └──────────────────────────────────────────────┘
//! ```

use form_relay::config::load_from_env;
use form_relay::lifecycle::{startup, Shutdown};
use form_relay::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config errors are reported before the subscriber knows the level.
    let config = match load_from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init_tracing("info");
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("form-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        port = config.listener.port,
        window_ms = config.rate_limit.window_ms,
        max_requests = config.rate_limit.max_requests,
        allowed_origin = %config.cors.allowed_origin,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
