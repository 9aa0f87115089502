//! Domain Layer
//!
//! The order model and the registry port. Nothing here knows about HTTP.

pub mod order_entry;
pub mod shared;
