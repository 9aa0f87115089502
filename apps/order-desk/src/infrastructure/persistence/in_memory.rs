//! In-memory order registry.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::order_entry::aggregate::{Order, OrderInput};
use crate::domain::order_entry::errors::OrderError;
use crate::domain::order_entry::registry::OrderRegistry;
use crate::domain::shared::{OrderIdGenerator, Timestamp};

#[derive(Debug, Default)]
struct RegistryState {
    orders: Vec<Order>,
    ids: OrderIdGenerator,
    last_timestamp: Option<Timestamp>,
}

/// In-memory implementation of `OrderRegistry`.
///
/// Orders live for the lifetime of the process. A single mutex covers
/// create, list and clear so insertion order and counts stay consistent
/// under parallel requests.
#[derive(Debug, Default)]
pub struct InMemoryOrderRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryOrderRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored orders.
    pub fn len(&self) -> Result<usize, OrderError> {
        Ok(self.lock()?.orders.len())
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> Result<bool, OrderError> {
        Ok(self.lock()?.orders.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RegistryState>, OrderError> {
        self.state
            .lock()
            .map_err(|e| OrderError::RegistryUnavailable {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl OrderRegistry for InMemoryOrderRegistry {
    async fn create(&self, input: OrderInput) -> Result<Order, OrderError> {
        let new_order = input.validate()?;

        let mut state = self.lock()?;

        // Never hand out a timestamp older than the previous one.
        let now = Timestamp::now();
        let timestamp = state.last_timestamp.map_or(now, |last| last.max(now));
        state.last_timestamp = Some(timestamp);

        let id = state.ids.generate();
        let order = new_order.into_order(id, timestamp);
        state.orders.push(order.clone());

        tracing::debug!(
            order_id = %order.id(),
            symbol = %order.symbol(),
            count = state.orders.len(),
            "Order stored"
        );

        Ok(order)
    }

    async fn list(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.lock()?.orders.clone())
    }

    async fn clear(&self) -> Result<usize, OrderError> {
        let mut state = self.lock()?;
        let removed = state.orders.len();
        state.orders.clear();
        Ok(removed)
    }
}
