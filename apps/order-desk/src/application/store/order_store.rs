//! Order Store
//!
//! Holds the client's order list and busy flag. Every mutation notifies
//! subscribers synchronously, after the state lock has been released.
//!
//! Busy is derived from the number of requests in flight, so overlapping
//! requests keep it set until the last one ends.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::subscription::{Listener, Listeners, Subscription};
use crate::application::ports::{ClientError, OrderApiPort};
use crate::domain::order_entry::aggregate::{Order, OrderInput};

/// Point-in-time copy of the store state handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Orders, oldest first.
    pub orders: Vec<Order>,
    /// True while a request is outstanding.
    pub busy: bool,
    /// Bumped on every change. Listeners racing on different threads use it
    /// to discard a snapshot older than one already seen.
    pub version: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: StoreSnapshot,
    in_flight: usize,
    held: bool,
}

impl StoreState {
    /// Recompute `busy`, returning whether it changed.
    fn refresh_busy(&mut self) -> bool {
        let busy = self.held || self.in_flight > 0;
        let changed = busy != self.snapshot.busy;
        self.snapshot.busy = busy;
        changed
    }
}

/// Store operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Fetching the order list failed.
    #[error("Failed to fetch orders: {0}")]
    Fetch(#[source] ClientError),

    /// Submitting an order failed.
    #[error("Failed to submit order: {0}")]
    Submit(#[source] ClientError),

    /// Clearing the server registry failed.
    #[error("Failed to clear orders: {0}")]
    Clear(#[source] ClientError),
}

impl StoreError {
    /// Underlying transport error.
    #[must_use]
    pub const fn client_error(&self) -> &ClientError {
        match self {
            Self::Fetch(e) | Self::Submit(e) | Self::Clear(e) => e,
        }
    }
}

/// Client-side order store.
///
/// Share it as `Arc<OrderStore<_>>` between the form, the table and
/// whatever drives them.
pub struct OrderStore<A>
where
    A: OrderApiPort,
{
    api: Arc<A>,
    state: RwLock<StoreState>,
    listeners: Arc<Mutex<Listeners>>,
}

impl<A> OrderStore<A>
where
    A: OrderApiPort,
{
    /// Create an empty, idle store around an API client.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::default()),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.read().snapshot.clone()
    }

    /// Copy of the current order list.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.state.read().snapshot.orders.clone()
    }

    /// Number of orders held locally.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().snapshot.orders.len()
    }

    /// Whether no orders are held locally.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().snapshot.orders.is_empty()
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state.read().snapshot.busy
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Register a callback invoked after every state change.
    ///
    /// The callback runs on the thread that made the change and may read
    /// the store, but must not mutate it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StoreSnapshot) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(callback);
        let id = self.listeners.lock().insert(listener);
        Subscription::new(id, &self.listeners)
    }

    /// Append one order to the end of the list.
    pub fn append(&self, order: Order) {
        self.update(|state| {
            state.snapshot.orders.push(order);
            true
        });
    }

    /// Replace the whole list.
    pub fn replace_all(&self, orders: Vec<Order>) {
        self.update(|state| {
            state.snapshot.orders = orders;
            true
        });
    }

    /// Empty the local list without contacting the server.
    pub fn clear_local(&self) {
        self.update(|state| {
            state.snapshot.orders.clear();
            true
        });
    }

    /// Hold or release the busy flag by hand.
    ///
    /// Busy stays set while any request is in flight, whatever is passed
    /// here. Subscribers are only notified on an actual change.
    pub fn set_busy(&self, busy: bool) {
        self.update(|state| {
            state.held = busy;
            state.refresh_busy()
        });
    }

    /// Load every order from the server, replacing the local list.
    ///
    /// On failure the local list is left untouched.
    pub async fn fetch_all(&self) -> Result<usize, StoreError> {
        let _busy = BusyGuard::acquire(self);

        match self.api.list_orders().await {
            Ok(list) => {
                let count = list.orders.len();
                if count != list.count {
                    tracing::warn!(
                        reported = list.count,
                        received = count,
                        "Order count mismatch in list response"
                    );
                }
                self.replace_all(list.orders);
                tracing::debug!(count, "Orders fetched");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch orders");
                Err(StoreError::Fetch(e))
            }
        }
    }

    /// Submit an order and append the stored result.
    pub async fn submit(&self, input: &OrderInput) -> Result<Order, StoreError> {
        let _busy = BusyGuard::acquire(self);

        match self.api.create_order(input).await {
            Ok(order) => {
                tracing::debug!(order_id = %order.id(), "Order submitted");
                self.append(order.clone());
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to submit order");
                Err(StoreError::Submit(e))
            }
        }
    }

    /// Empty the local list, then clear the server registry.
    ///
    /// The local list stays empty even if the server call fails.
    pub async fn clear_all(&self) -> Result<String, StoreError> {
        self.clear_local();
        let _busy = BusyGuard::acquire(self);

        match self.api.clear_orders().await {
            Ok(message) => {
                tracing::debug!(%message, "Server orders cleared");
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear orders");
                Err(StoreError::Clear(e))
            }
        }
    }

    fn begin_request(&self) {
        self.update(|state| {
            state.in_flight += 1;
            state.refresh_busy()
        });
    }

    fn end_request(&self) {
        self.update(|state| {
            state.in_flight = state.in_flight.saturating_sub(1);
            state.refresh_busy()
        });
    }

    /// Apply `change` under the write lock; notify if it reports a change.
    fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut StoreState) -> bool,
    {
        let changed = {
            let mut state = self.state.write();
            let changed = change(&mut *state);
            if changed {
                state.snapshot.version += 1;
            }
            changed
        };
        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        let listeners = self.listeners.lock().current();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl<A> std::fmt::Debug for OrderStore<A>
where
    A: OrderApiPort,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("OrderStore")
            .field("orders", &state.snapshot.orders.len())
            .field("busy", &state.snapshot.busy)
            .field("in_flight", &state.in_flight)
            .finish_non_exhaustive()
    }
}

/// Counts a request in flight from creation until drop, whichever way the
/// request ends.
struct BusyGuard<'a, A>
where
    A: OrderApiPort,
{
    store: &'a OrderStore<A>,
}

impl<'a, A> BusyGuard<'a, A>
where
    A: OrderApiPort,
{
    fn acquire(store: &'a OrderStore<A>) -> Self {
        store.begin_request();
        Self { store }
    }
}

impl<A> Drop for BusyGuard<'_, A>
where
    A: OrderApiPort,
{
    fn drop(&mut self) {
        self.store.end_request();
    }
}
