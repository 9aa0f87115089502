//! HTTP/REST API adapter.
//!
//! Inbound adapter exposing the order registry as JSON endpoints.

mod controller;
mod error;
mod response;

pub use controller::{AppState, create_router};
pub use error::{ApiError, ErrorCode, INTERNAL_ERROR_MESSAGE, INVALID_BODY_MESSAGE};
pub use response::{
    ClearOrdersResponse, CreateOrderResponse, ErrorResponse, HealthResponse, ListOrdersResponse,
};
