//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Submission pipeline:
//!     → events.rs (SubmissionEvents hooks, masked data only)
//!         → tracing (structured log events)
//!
//! HTTP layer:
//!     → metrics.rs (counters, histograms, gauges)
//!     → TraceLayer spans carrying x-request-id
//!
//! Consumers:
//!     → stdout via logging.rs subscriber
//!     → Prometheus scrape (optional)
//! ```
//!
//! # Design Decisions
//! - Raw emails and tokens never reach a log line
//! - Metrics are cheap no-ops when no exporter is installed

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{NoopEvents, SubmissionEvents, TracingEvents};
