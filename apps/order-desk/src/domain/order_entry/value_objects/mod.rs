//! Order entry value objects.

mod instrument;
mod order_side;
mod order_type;

pub use instrument::Instrument;
pub use order_side::OrderSide;
pub use order_type::OrderType;
