//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, peer address)
//!     → submission::SubmissionService (admission, validation, forwarding)
//!     → response.rs (JSON envelope, Retry-After)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use response::{SubmitResponse, SUCCESS_MESSAGE};
pub use server::{AppState, HttpServer, SUBMIT_PATH};
