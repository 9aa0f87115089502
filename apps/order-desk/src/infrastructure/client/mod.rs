//! Order API client.
//!
//! reqwest adapter implementing `OrderApiPort` against the order endpoints.

mod http_client;

pub use http_client::{DEFAULT_TIMEOUT, HttpOrderApi};
