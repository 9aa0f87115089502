// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Order Desk - Rust Core Library
//!
//! A small order-entry desk: a form collects a trade order, the client store
//! posts it to the server, the server keeps every order in memory, and a
//! table renders the store's list as it changes.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Order entity, value objects, the `OrderRegistry` port
//!   - `order_entry`: Order, OrderInput, side/type/instrument, errors
//!   - `shared`: identifiers, symbols, timestamps
//!
//! - **Application**: Client-side orchestration
//!   - `ports`: `OrderApiPort` (transport to the order API)
//!   - `store`: reactive `OrderStore` with subscriptions and a busy flag
//!
//! - **Infrastructure**: Adapters
//!   - `persistence`: in-memory order registry
//!   - `http`: axum endpoints over the registry
//!   - `client`: reqwest adapter for `OrderApiPort`
//!   - `config`, `telemetry`: environment config and tracing setup
//!
//! - **Presentation**: `OrderForm` and `OrderTable` components
//!
//! # Data Flow
//!
//! ```text
//! OrderForm ──► OrderStore::submit ──► POST /api/order ──► InMemoryOrderRegistry
//!                    │                                            │
//!                    ◄──────────── 201 {order} ◄──────────────────┘
//!                    │
//!                    └──► subscribers ──► OrderTable re-render
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core order model with no transport dependencies.
pub mod domain;

/// Application layer - Client store and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Presentation layer - Form and table components.
pub mod presentation;

#[cfg(test)]
mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::order_entry::{
    aggregate::{Order, OrderInput},
    errors::OrderError,
    registry::OrderRegistry,
    value_objects::{Instrument, OrderSide, OrderType},
};
pub use domain::shared::{OrderId, OrderIdGenerator, Symbol, Timestamp};

// Application re-exports
pub use application::ports::{ClientError, OrderApiPort, OrderList};
pub use application::store::{OrderStore, StoreError, StoreSnapshot, Subscription};

// Infrastructure re-exports
pub use infrastructure::client::HttpOrderApi;
pub use infrastructure::config::{AppConfig, ConfigError, RunMode};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::persistence::InMemoryOrderRegistry;

// Presentation re-exports
pub use presentation::form::{FieldErrors, FormField, OrderForm, SubmitOutcome};
pub use presentation::table::{OrderRow, OrderTable, TableView};
