//! Observer registry - Explicit subscribe/notify contract for transitions

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::RwLock;
use tracing::debug;

use crate::ports::{ReviewObserver, TransitionNotification};

/// Handle returned by [`ObserverRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Set of observers notified after each terminal transition
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: AtomicU64,
    observers: RwLock<Vec<(SubscriptionId, Arc<dyn ReviewObserver>)>>,
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.read().len())
            .finish_non_exhaustive()
    }
}

impl ObserverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn subscribe(&self, observer: Arc<dyn ReviewObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, observer));
        debug!(subscription = %id, "Observer subscribed");
        id
    }

    /// Remove an observer; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        before != observers.len()
    }

    /// Number of registered observers
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Whether no observer is registered
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Deliver a notification to every observer in subscription order
    pub fn notify(&self, notification: &TransitionNotification) {
        // Snapshot so observers may subscribe or unsubscribe from the callback
        let observers: Vec<Arc<dyn ReviewObserver>> = self
            .observers
            .read()
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();

        for observer in observers {
            observer.on_transition(notification);
        }
    }
}
