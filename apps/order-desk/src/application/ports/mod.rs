//! Port Definitions
//!
//! Interfaces the application layer needs from the outside world.

mod order_api_port;

pub use order_api_port::{ClientError, OrderApiPort, OrderList};
