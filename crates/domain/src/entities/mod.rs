//! Domain entities - Objects with identity and lifecycle

mod audit_trail;
mod meeting;
mod review_record;
mod reviewable_item;

pub use audit_trail::AuditTrail;
pub use meeting::{CapacityWarning, Meeting};
pub use review_record::{CHANGES_REQUIRED_MARKER, ReviewAction, ReviewRecord};
pub use reviewable_item::ReviewableItem;
