//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming submission:
//!     → client_ip.rs (derive client identifier from proxy headers / peer)
//!     → rate_limit.rs (sliding-window admission per identifier)
//!     → Pass to submission handling
//! ```
//!
//! # Design Decisions
//! - Admission is checked before the body is even parsed
//! - Limiter state is in-memory and per process
//! - Time is injected so window behaviour is testable

pub mod client_ip;
pub mod clock;
pub mod rate_limit;

pub use client_ip::client_identifier;
pub use clock::{Clock, MockClock, SystemClock};
pub use rate_limit::{Admission, Decision, SlidingWindowLimiter};
