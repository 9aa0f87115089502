//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API passing straight through to the order registry.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::domain::order_entry::aggregate::OrderInput;
use crate::domain::order_entry::registry::OrderRegistry;

use super::error::ApiError;
use super::response::{
    ClearOrdersResponse, CreateOrderResponse, HealthResponse, ListOrdersResponse,
};

/// Application state shared across handlers.
pub struct AppState<R>
where
    R: OrderRegistry,
{
    /// The order registry, constructed once at startup.
    pub registry: Arc<R>,
    /// Application version.
    pub version: String,
}

impl<R> AppState<R>
where
    R: OrderRegistry,
{
    /// Create state around a registry.
    #[must_use]
    pub fn new(registry: Arc<R>) -> Self {
        Self {
            registry,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl<R> Clone for AppState<R>
where
    R: OrderRegistry,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<R>(state: AppState<R>) -> Router
where
    R: OrderRegistry + 'static,
{
    Router::new()
        .route("/health", get(health_check::<R>))
        .route("/api/order", post(create_order::<R>))
        .route("/api/orders", get(list_orders::<R>).delete(clear_orders::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<R>(State(state): State<AppState<R>>) -> impl IntoResponse
where
    R: OrderRegistry,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Create order endpoint.
async fn create_order<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<OrderInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    R: OrderRegistry,
{
    let Json(input) = payload.map_err(|rejection| {
        tracing::info!(error = %rejection.body_text(), "Rejected undecodable order body");
        ApiError::invalid_body()
    })?;

    let order = state.registry.create(input).await?;

    tracing::info!(
        order_id = %order.id(),
        symbol = %order.symbol(),
        order_type = %order.order_type(),
        side = %order.side(),
        quantity = order.quantity(),
        "Order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            success: true,
            order,
        }),
    ))
}

/// List orders endpoint.
async fn list_orders<R>(State(state): State<AppState<R>>) -> Result<impl IntoResponse, ApiError>
where
    R: OrderRegistry,
{
    let orders = state.registry.list().await?;
    let count = orders.len();

    tracing::debug!(count, "Listing orders");

    Ok(Json(ListOrdersResponse {
        success: true,
        orders,
        count,
    }))
}

/// Clear orders endpoint.
async fn clear_orders<R>(State(state): State<AppState<R>>) -> Result<impl IntoResponse, ApiError>
where
    R: OrderRegistry,
{
    let removed = state.registry.clear().await?;

    tracing::info!(removed, "Orders cleared");

    Ok(Json(ClearOrdersResponse::for_removed(removed)))
}
