//! Port for reviewable item persistence

use async_trait::async_trait;
use domain::{ItemId, ReviewStatus, ReviewableItem};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for storing reviewable items
///
/// Implementations own their collection; callers only read copies and write
/// back whole items.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReviewItemStore: Send + Sync {
    /// Store a newly registered item
    async fn insert(&self, item: &ReviewableItem) -> Result<(), ApplicationError>;

    /// Get an item by ID
    async fn get(&self, id: &ItemId) -> Result<Option<ReviewableItem>, ApplicationError>;

    /// Replace an existing item if its stored version is still `expected_version`
    ///
    /// Returns `Conflict` when another writer got there first and
    /// `UnknownReference` if the item was never inserted.
    async fn update(
        &self,
        item: &ReviewableItem,
        expected_version: u64,
    ) -> Result<(), ApplicationError>;

    /// All items in registration order
    async fn list(&self) -> Result<Vec<ReviewableItem>, ApplicationError>;

    /// Items currently in the given status, in registration order
    async fn list_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<ReviewableItem>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn ReviewItemStore) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ReviewItemStore>();
    }
}
