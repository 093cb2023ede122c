//! Observer registration handles.
//!
//! Every bridge that emits events (engine, item, surface, lifecycle) hands
//! back a [`Subscription`] when an observer is registered. Dropping the handle
//! (or calling [`Subscription::cancel`]) deregisters the observer. The core
//! keeps these handles next to the state they feed, so releasing that state
//! releases the observers deterministically.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

type Unsubscribe = Box<dyn FnOnce() + Send>;

/// Identifier of a registered observer, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocate the next identifier.
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// RAII handle for a registered observer.
///
/// Implementations pass the deregistration routine to [`Subscription::new`];
/// it runs exactly once, on [`cancel`](Subscription::cancel) or on drop.
#[must_use = "dropping a Subscription immediately deregisters the observer"]
pub struct Subscription {
    id: SubscriptionId,
    unsubscribe: Option<Unsubscribe>,
}

impl Subscription {
    pub fn new<F>(id: SubscriptionId, unsubscribe: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Handle for a bridge that has nothing to deregister.
    pub fn detached() -> Self {
        Self {
            id: SubscriptionId::next(),
            unsubscribe: None,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }

    /// Deregister now. Subsequent calls (and the drop) do nothing.
    pub fn cancel(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
