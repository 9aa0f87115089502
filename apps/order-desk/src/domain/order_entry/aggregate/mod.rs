//! Order aggregate and its input shape.

mod order;

pub use order::{
    MAX_PRICE_DIGITS, MAX_PRICE_SCALE, NewOrder, Order, OrderInput, check_price_precision,
};
