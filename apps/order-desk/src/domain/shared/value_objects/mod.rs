//! Shared value objects.

mod identifiers;
mod symbol;
mod timestamp;

pub use identifiers::{OrderId, OrderIdGenerator};
pub use symbol::Symbol;
pub use timestamp::Timestamp;
