//! Outbound calls to the upstream automation API.
//!
//! # Design Decisions
//! - One POST per submission, never retried
//! - Every call is bounded by a connect and a total timeout
//! - The handler talks to a `Forwarder` trait so tests can stand in
//!   for the network

pub mod client;

pub use client::{Forwarder, HttpForwarder, UpstreamError, UpstreamReply, UpstreamTarget, USER_AGENT};
