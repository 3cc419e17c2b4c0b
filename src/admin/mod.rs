//! Operator diagnostics, mounted only when `debug.expose_config` is set.

pub mod handlers;

use axum::{routing::get, Router};

use self::handlers::get_config;
use crate::http::server::AppState;

pub fn debug_router() -> Router<AppState> {
    Router::new().route("/debug/config", get(get_config))
}
