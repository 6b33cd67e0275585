//! Value Objects - Immutable, identity-less domain primitives

mod form_review;
mod item_id;
mod item_kind;
mod meeting_id;
mod review_method;
mod review_status;

pub use form_review::FormReviewOutcome;
pub use item_id::ItemId;
pub use item_kind::ItemKind;
pub use meeting_id::MeetingId;
pub use review_method::{ReviewMethod, ReviewRouting};
pub use review_status::{ReviewPanel, ReviewStatus};
