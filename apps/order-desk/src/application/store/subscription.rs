//! Store subscriptions.
//!
//! A listener stays registered for as long as its `Subscription` guard lives.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::order_store::StoreSnapshot;

pub(super) type Listener = Arc<dyn Fn(&StoreSnapshot) + Send + Sync>;

#[derive(Default)]
pub(super) struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

impl Listeners {
    pub(super) fn insert(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(super) fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    /// Copy of the current listeners, so callbacks run without the lock held.
    pub(super) fn current(&self) -> Vec<Listener> {
        self.entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Guard returned by `OrderStore::subscribe`; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    pub(super) fn new(id: u64, listeners: &Arc<Mutex<Listeners>>) -> Self {
        Self {
            id,
            listeners: Arc::downgrade(listeners),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The store may already be gone.
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
