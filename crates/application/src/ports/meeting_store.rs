//! Port for meeting persistence
//!
//! Meetings are provisioned externally; the workflow only reads them and
//! writes back counter changes.

use async_trait::async_trait;
use domain::{Meeting, MeetingId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for storing committee meetings
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Get a meeting by ID
    async fn get(&self, id: &MeetingId) -> Result<Option<Meeting>, ApplicationError>;

    /// All meetings, in no particular order
    async fn list(&self) -> Result<Vec<Meeting>, ApplicationError>;

    /// Write `meeting` only if the stored copy still has `expected_version`
    ///
    /// Returns `Ok(false)` when another writer got there first; the caller
    /// should re-read and retry. Returns `UnknownReference` if the meeting
    /// does not exist.
    async fn compare_and_swap(
        &self,
        meeting: &Meeting,
        expected_version: u64,
    ) -> Result<bool, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn MeetingStore) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn MeetingStore>();
    }
}
