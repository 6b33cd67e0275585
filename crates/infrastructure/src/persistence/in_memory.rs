//! In-memory adapters for both stores
//!
//! Useful for embedding the workflow without a database and for tests.

use std::collections::{BTreeMap, HashMap};

use application::{
    error::ApplicationError,
    ports::{MeetingStore, ReviewItemStore},
};
use async_trait::async_trait;
use domain::{ItemId, Meeting, MeetingId, ReviewStatus, ReviewableItem};
use parking_lot::RwLock;

/// Review item store held in a map
#[derive(Debug, Default)]
pub struct InMemoryReviewItemStore {
    items: RwLock<HashMap<ItemId, ReviewableItem>>,
}

impl InMemoryReviewItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self, filter: impl Fn(&ReviewableItem) -> bool) -> Vec<ReviewableItem> {
        let mut items: Vec<_> = self.items.read().values().filter(|i| filter(i)).cloned().collect();
        items.sort_by_key(|i| (i.created_at(), i.id()));
        items
    }
}

#[async_trait]
impl ReviewItemStore for InMemoryReviewItemStore {
    async fn insert(&self, item: &ReviewableItem) -> Result<(), ApplicationError> {
        let mut items = self.items.write();
        if items.contains_key(&item.id()) {
            return Err(ApplicationError::Conflict(format!(
                "item {} already exists",
                item.id()
            )));
        }
        items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<ReviewableItem>, ApplicationError> {
        Ok(self.items.read().get(id).cloned())
    }

    async fn update(
        &self,
        item: &ReviewableItem,
        expected_version: u64,
    ) -> Result<(), ApplicationError> {
        let mut items = self.items.write();
        let stored = items
            .get_mut(&item.id())
            .ok_or_else(|| ApplicationError::unknown("item", item.id()))?;
        if stored.version() != expected_version {
            return Err(ApplicationError::Conflict(format!("item {}", item.id())));
        }
        *stored = item.clone();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ReviewableItem>, ApplicationError> {
        Ok(self.sorted(|_| true))
    }

    async fn list_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<ReviewableItem>, ApplicationError> {
        Ok(self.sorted(|i| i.status() == status))
    }
}

/// Meeting store held in a map, with version-checked writes
#[derive(Debug, Default)]
pub struct InMemoryMeetingStore {
    meetings: RwLock<BTreeMap<MeetingId, Meeting>>,
}

impl InMemoryMeetingStore {
    /// Create a store seeded with the given meetings
    pub fn with_meetings(meetings: impl IntoIterator<Item = Meeting>) -> Self {
        Self {
            meetings: RwLock::new(meetings.into_iter().map(|m| (m.id(), m)).collect()),
        }
    }
}

#[async_trait]
impl MeetingStore for InMemoryMeetingStore {
    async fn get(&self, id: &MeetingId) -> Result<Option<Meeting>, ApplicationError> {
        Ok(self.meetings.read().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Meeting>, ApplicationError> {
        Ok(self.meetings.read().values().cloned().collect())
    }

    async fn compare_and_swap(
        &self,
        meeting: &Meeting,
        expected_version: u64,
    ) -> Result<bool, ApplicationError> {
        let mut meetings = self.meetings.write();
        let stored = meetings
            .get_mut(&meeting.id())
            .ok_or_else(|| ApplicationError::unknown("meeting", meeting.id()))?;
        if stored.version() != expected_version {
            return Ok(false);
        }
        *stored = meeting.clone();
        Ok(true)
    }
}
