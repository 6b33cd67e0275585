//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod meeting_store;
mod review_item_store;
mod review_observer;

#[cfg(test)]
pub use meeting_store::MockMeetingStore;
pub use meeting_store::MeetingStore;
#[cfg(test)]
pub use review_item_store::MockReviewItemStore;
pub use review_item_store::ReviewItemStore;
pub use review_observer::{ReviewObserver, TransitionNotification};
