//! HTTP response DTOs.
//!
//! Shared by the axum handlers and the reqwest client.

use serde::{Deserialize, Serialize};

use crate::domain::order_entry::aggregate::Order;

/// Response from order creation (201).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// Always true.
    pub success: bool,
    /// The stored order with its server-assigned id and timestamp.
    pub order: Order,
}

/// Response from listing orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrdersResponse {
    /// Always true.
    pub success: bool,
    /// Orders in insertion order.
    pub orders: Vec<Order>,
    /// Number of orders.
    pub count: usize,
}

/// Response from clearing orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearOrdersResponse {
    /// Always true.
    pub success: bool,
    /// Confirmation, e.g. "Cleared 3 orders".
    pub message: String,
}

impl ClearOrdersResponse {
    /// Build the confirmation for `removed` orders.
    #[must_use]
    pub fn for_removed(removed: usize) -> Self {
        Self {
            success: true,
            message: format!("Cleared {removed} orders"),
        }
    }
}

/// Error body for any failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Client-facing message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
