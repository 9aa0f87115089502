//! Order API Port (Driven Port)
//!
//! Interface to the order endpoints, as seen from the client.

use async_trait::async_trait;

use crate::domain::order_entry::aggregate::{Order, OrderInput};

/// Transport errors seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// The server could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Result of listing orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderList {
    /// Orders in server insertion order.
    pub orders: Vec<Order>,
    /// Count reported by the server.
    pub count: usize,
}

/// Port for the three order operations.
#[async_trait]
pub trait OrderApiPort: Send + Sync {
    /// Submit an order; returns the stored order.
    async fn create_order(&self, input: &OrderInput) -> Result<Order, ClientError>;

    /// Fetch every order held by the server.
    async fn list_orders(&self) -> Result<OrderList, ClientError>;

    /// Clear the server registry; returns the confirmation message.
    async fn clear_orders(&self) -> Result<String, ClientError>;
}
