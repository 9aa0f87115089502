//! Persistence Adapters
//!
//! Implementations of the `OrderRegistry` port.

pub mod in_memory;

pub use in_memory::InMemoryOrderRegistry;
