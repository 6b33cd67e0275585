//! Port for transition notifications
//!
//! Surfaces that display an item (action panel, history view) register an
//! observer and react to terminal transitions without the workflow knowing
//! anything about rendering.

use domain::{CapacityWarning, ItemId, ReviewRecord, ReviewStatus};
use serde::Serialize;

/// Emitted after every successful terminal transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionNotification {
    /// Item that changed
    pub item_id: ItemId,
    /// Status the item is now in
    pub status: ReviewStatus,
    /// Record appended by the transition
    pub new_record: ReviewRecord,
    /// Whether the active review panel must be replaced by the history view
    pub hide_active_panel: bool,
    /// Set when an approval was routed to a lane already at quota
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_warning: Option<CapacityWarning>,
}

/// Receiver of transition notifications
pub trait ReviewObserver: Send + Sync {
    /// Called synchronously after the transition has been stored
    fn on_transition(&self, notification: &TransitionNotification);
}

impl<F> ReviewObserver for F
where
    F: Fn(&TransitionNotification) + Send + Sync,
{
    fn on_transition(&self, notification: &TransitionNotification) {
        self(notification);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn closures_are_observers() {
        let calls = AtomicUsize::new(0);
        let observer = |_: &TransitionNotification| {
            calls.fetch_add(1, Ordering::SeqCst);
        };

        let notification = TransitionNotification {
            item_id: ItemId::new(),
            status: ReviewStatus::Returned,
            new_record: ReviewRecord::returned("bob", "Fix budget"),
            hide_active_panel: true,
            capacity_warning: None,
        };
        observer.on_transition(&notification);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notification_serialization_skips_missing_warning() {
        let notification = TransitionNotification {
            item_id: ItemId::new(),
            status: ReviewStatus::Approved,
            new_record: ReviewRecord::approved("bob", ""),
            hide_active_panel: true,
            capacity_warning: None,
        };
        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("\"hide_active_panel\":true"));
        assert!(!json.contains("capacity_warning"));
    }
}
