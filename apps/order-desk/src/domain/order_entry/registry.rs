//! Order Registry Trait
//!
//! The authoritative, process-lifetime collection of orders. Implemented by
//! adapters in the infrastructure layer.

use async_trait::async_trait;

use super::aggregate::{Order, OrderInput};
use super::errors::OrderError;

/// Registry of submitted orders, kept in insertion order.
///
/// There is no lookup, update or single delete: orders are appended on
/// creation and only ever removed all at once.
#[async_trait]
pub trait OrderRegistry: Send + Sync {
    /// Validate an input, assign its id and timestamp, and append it.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredFields` or `InvalidParameters` for bad input,
    /// `RegistryUnavailable` if storage cannot be accessed.
    async fn create(&self, input: OrderInput) -> Result<Order, OrderError>;

    /// All orders in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryUnavailable` if storage cannot be accessed.
    async fn list(&self) -> Result<Vec<Order>, OrderError>;

    /// Remove every order, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RegistryUnavailable` if storage cannot be accessed.
    async fn clear(&self) -> Result<usize, OrderError>;
}
