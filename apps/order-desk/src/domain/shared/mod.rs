//! Shared Domain Types
//!
//! Value objects used across the order desk.

pub mod value_objects;

pub use value_objects::{OrderId, OrderIdGenerator, Symbol, Timestamp};
