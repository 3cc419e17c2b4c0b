//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file at $RELAY_CONFIG)
//!     → loader.rs (PORT / UPSTREAM_API_URL / UPSTREAM_API_TOKEN / ALLOWED_ORIGIN)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the handlers
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never changes afterwards
//! - All fields have defaults to allow an empty environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    CorsConfig, DebugConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, RelayConfig,
    SecurityConfig, StaticFilesConfig, TimeoutConfig, UpstreamConfig,
};
