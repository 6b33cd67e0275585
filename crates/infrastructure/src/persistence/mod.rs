//! Persistence module
//!
//! SQLite-backed stores for reviewable items and meetings, plus in-memory
//! equivalents.

pub mod error;
pub mod in_memory;
pub mod meeting_store;
pub mod review_item_store;
pub mod state_db;

pub use in_memory::{InMemoryMeetingStore, InMemoryReviewItemStore};
pub use meeting_store::SqliteMeetingStore;
pub use review_item_store::SqliteReviewItemStore;
pub use state_db::{StateDb, StateDbConfig, StateDbError};
