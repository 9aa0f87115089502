//! Order Entry Bounded Context
//!
//! The order entity, its input shape, and the registry port that stores it.

pub mod aggregate;
pub mod errors;
pub mod registry;
pub mod value_objects;
