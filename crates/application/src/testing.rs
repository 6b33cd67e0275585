//! Test doubles shared by service tests

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{ItemId, Meeting, MeetingId, ReviewStatus, ReviewableItem};
use parking_lot::Mutex;

use crate::{
    error::ApplicationError,
    ports::{MeetingStore, ReviewItemStore},
};

/// Item store backed by a vector, with switchable write failures
#[derive(Default)]
pub struct FakeItemStore {
    pub items: Mutex<Vec<ReviewableItem>>,
    pub fail_updates: AtomicBool,
}

impl FakeItemStore {
    pub fn with(items: Vec<ReviewableItem>) -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(items),
            fail_updates: AtomicBool::new(false),
        })
    }

    pub fn stored(&self, id: &ItemId) -> Option<ReviewableItem> {
        self.items.lock().iter().find(|i| i.id() == *id).cloned()
    }
}

#[async_trait]
impl ReviewItemStore for FakeItemStore {
    async fn insert(&self, item: &ReviewableItem) -> Result<(), ApplicationError> {
        self.items.lock().push(item.clone());
        Ok(())
    }

    /// Yields after reading so that concurrent callers interleave
    async fn get(&self, id: &ItemId) -> Result<Option<ReviewableItem>, ApplicationError> {
        let item = self.stored(id);
        tokio::task::yield_now().await;
        Ok(item)
    }

    async fn update(
        &self,
        item: &ReviewableItem,
        expected_version: u64,
    ) -> Result<(), ApplicationError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ApplicationError::Storage("disk full".to_string()));
        }
        let mut items = self.items.lock();
        let existing = items
            .iter_mut()
            .find(|i| i.id() == item.id())
            .ok_or_else(|| ApplicationError::unknown("item", item.id()))?;
        if existing.version() != expected_version {
            return Err(ApplicationError::Conflict(format!("item {}", item.id())));
        }
        *existing = item.clone();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ReviewableItem>, ApplicationError> {
        Ok(self.items.lock().clone())
    }

    async fn list_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<ReviewableItem>, ApplicationError> {
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|i| i.status() == status)
            .cloned()
            .collect())
    }
}

/// Meeting store with version-checked writes
#[derive(Default)]
pub struct FakeMeetingStore {
    pub meetings: Mutex<Vec<Meeting>>,
}

impl FakeMeetingStore {
    pub fn with(meetings: Vec<Meeting>) -> Arc<Self> {
        Arc::new(Self {
            meetings: Mutex::new(meetings),
        })
    }

    pub fn stored(&self, id: MeetingId) -> Option<Meeting> {
        self.meetings.lock().iter().find(|m| m.id() == id).cloned()
    }
}

#[async_trait]
impl MeetingStore for FakeMeetingStore {
    async fn get(&self, id: &MeetingId) -> Result<Option<Meeting>, ApplicationError> {
        Ok(self.stored(*id))
    }

    async fn list(&self) -> Result<Vec<Meeting>, ApplicationError> {
        Ok(self.meetings.lock().clone())
    }

    async fn compare_and_swap(
        &self,
        meeting: &Meeting,
        expected_version: u64,
    ) -> Result<bool, ApplicationError> {
        let mut meetings = self.meetings.lock();
        let stored = meetings
            .iter_mut()
            .find(|m| m.id() == meeting.id())
            .ok_or_else(|| ApplicationError::unknown("meeting", meeting.id()))?;
        if stored.version() != expected_version {
            return Ok(false);
        }
        *stored = meeting.clone();
        Ok(true)
    }
}

/// Build a meeting with `(count, limit)` pairs for the quick and meeting lanes
pub fn meeting(id: u64, day: &str, quick: (u32, u32), full: (u32, u32)) -> Meeting {
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap();
    Meeting::new(MeetingId::new(id), date, format!("Session {id}"), quick.1, full.1)
        .with_counts(quick.0, full.0)
        .unwrap()
}

/// A full early-March meeting followed by an open mid-March one
pub fn march_meetings() -> Vec<Meeting> {
    vec![
        meeting(1, "2025-03-01", (5, 5), (8, 8)),
        meeting(2, "2025-03-15", (1, 5), (2, 8)),
    ]
}
