//! Client Store
//!
//! Client-local mirror of the orders this client has fetched or submitted,
//! plus a busy flag. Components subscribe for push notifications instead of
//! polling.

mod order_store;
mod subscription;

pub use order_store::{OrderStore, StoreError, StoreSnapshot};
pub use subscription::Subscription;
