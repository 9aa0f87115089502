//! Application Layer
//!
//! Client-side orchestration: the transport port and the reactive store that
//! the presentation components observe.

pub mod ports;
pub mod store;
