//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::application::ports::{ClientError, OrderApiPort, OrderList};
use crate::domain::order_entry::aggregate::{Order, OrderInput};
use crate::domain::order_entry::registry::OrderRegistry;
use crate::domain::order_entry::value_objects::{OrderSide, OrderType};
use crate::domain::shared::Symbol;
use crate::infrastructure::http::ClearOrdersResponse;
use crate::infrastructure::persistence::InMemoryOrderRegistry;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Gated {
    Never,
    Creates,
    Always,
}

/// Order API backed directly by an in-memory registry, skipping HTTP.
pub struct FakeOrderApi {
    registry: InMemoryOrderRegistry,
    failure: Mutex<Option<ClientError>>,
    gated: Gated,
    entered: Notify,
    gate: Notify,
    create_calls: AtomicUsize,
}

impl FakeOrderApi {
    pub fn new() -> Self {
        Self {
            registry: InMemoryOrderRegistry::new(),
            failure: Mutex::new(None),
            gated: Gated::Never,
            entered: Notify::new(),
            gate: Notify::new(),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Every request parks until `release` is called.
    pub fn gated() -> Self {
        Self {
            gated: Gated::Always,
            ..Self::new()
        }
    }

    /// Only `create_order` parks; lists and clears go straight through.
    pub fn gated_creates() -> Self {
        Self {
            gated: Gated::Creates,
            ..Self::new()
        }
    }

    /// Make every following request fail with `error`.
    pub fn fail_with(&self, error: ClientError) {
        *self.failure.lock() = Some(error);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Store an order server-side without going through the client.
    pub async fn seed(&self, input: &OrderInput) -> Order {
        self.registry.create(input.clone()).await.unwrap()
    }

    pub fn server_len(&self) -> usize {
        self.registry.len().unwrap()
    }

    pub async fn wait_for_request(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    async fn enter(&self, create: bool) -> Result<(), ClientError> {
        let parks = match self.gated {
            Gated::Never => false,
            Gated::Creates => create,
            Gated::Always => true,
        };
        if parks {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        self.failure.lock().clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl OrderApiPort for FakeOrderApi {
    async fn create_order(&self, input: &OrderInput) -> Result<Order, ClientError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(true).await?;
        self.registry
            .create(input.clone())
            .await
            .map_err(|e| ClientError::Rejected {
                status: if e.is_validation() { 400 } else { 500 },
                message: e.to_string(),
            })
    }

    async fn list_orders(&self) -> Result<OrderList, ClientError> {
        self.enter(false).await?;
        let orders = self.registry.list().await.unwrap();
        let count = orders.len();
        Ok(OrderList { orders, count })
    }

    async fn clear_orders(&self) -> Result<String, ClientError> {
        self.enter(false).await?;
        let removed = self.registry.clear().await.unwrap();
        Ok(ClearOrdersResponse::for_removed(removed).message)
    }
}

/// Valid Market order input.
pub fn market_input(symbol: &str, quantity: u64, side: OrderSide) -> OrderInput {
    OrderInput {
        symbol: Some(Symbol::new(symbol)),
        order_type: Some(OrderType::Market),
        quantity: Some(quantity),
        side: Some(side),
        price: None,
        stop_price: None,
    }
}
