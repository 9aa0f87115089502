//! Infrastructure Layer
//!
//! Adapters around the domain: storage, the HTTP API, the HTTP client,
//! configuration and tracing.

pub mod client;
pub mod config;
pub mod http;
pub mod persistence;
pub mod telemetry;
