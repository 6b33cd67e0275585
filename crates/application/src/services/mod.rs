//! Application services - Use case implementations

mod audit_trail;
mod batch_approval_service;
mod capacity_allocator;
mod observer_registry;
mod review_service;

pub use audit_trail::AuditTrailRecorder;
pub use batch_approval_service::{BatchApprovalService, BatchFailure, BatchOutcome};
pub use capacity_allocator::{
    CapacityPolicy, DEFAULT_RESERVATION_RETRIES, MeetingCapacityAllocator, MeetingSlot,
    Reservation,
};
pub use observer_registry::{ObserverRegistry, SubscriptionId};
pub use review_service::{ApprovalPrompt, ReviewService, TransitionOutcome};
