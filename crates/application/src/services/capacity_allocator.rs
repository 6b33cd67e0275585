//! Meeting capacity allocator - Chooses meetings and reserves lane slots

use std::{fmt, sync::Arc};

use domain::{CapacityWarning, DomainError, Meeting, MeetingId, ReviewMethod, sorted_by_date};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::MeetingStore};

/// Default number of retries when a meeting changes under a reservation
pub const DEFAULT_RESERVATION_RETRIES: u32 = 3;

/// How strictly lane quotas are enforced on approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityPolicy {
    /// Over-quota approvals proceed with a warning
    #[default]
    Soft,
    /// Over-quota approvals are refused
    Hard,
}

impl fmt::Display for CapacityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soft => write!(f, "soft"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for CapacityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soft" => Ok(Self::Soft),
            "hard" => Ok(Self::Hard),
            other => Err(format!(
                "Invalid capacity policy: {other}. Use 'soft' or 'hard'"
            )),
        }
    }
}

/// Result of routing an approval through a meeting lane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// A slot was taken; holds the meeting as stored afterwards
    Reserved(Meeting),
    /// The lane was full and the soft policy let the approval through
    /// without taking a slot
    OverQuota(CapacityWarning),
}

impl Reservation {
    /// Warning to surface to the reviewer, if any
    pub const fn warning(&self) -> Option<CapacityWarning> {
        match self {
            Self::Reserved(_) => None,
            Self::OverQuota(warning) => Some(*warning),
        }
    }

    /// Whether a counter was actually incremented
    pub const fn took_slot(&self) -> bool {
        matches!(self, Self::Reserved(_))
    }
}

/// Remaining capacity of a meeting, as offered on the approval surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingSlot {
    /// The meeting
    pub meeting: Meeting,
    /// Free quick-review slots
    pub quick_remaining: u32,
    /// Free meeting-review slots
    pub meeting_remaining: u32,
    /// Both lanes at quota
    pub is_full: bool,
}

impl From<Meeting> for MeetingSlot {
    fn from(meeting: Meeting) -> Self {
        Self {
            quick_remaining: meeting.remaining(ReviewMethod::Quick),
            meeting_remaining: meeting.remaining(ReviewMethod::Meeting),
            is_full: meeting.is_full(),
            meeting,
        }
    }
}

/// Selects meetings for approved items and safely increments their counters
///
/// Counter updates are compare-and-increment: the meeting is read, the slot
/// is taken on the copy, and the copy is written back only if the stored
/// version is unchanged. On conflict the whole step is retried.
pub struct MeetingCapacityAllocator {
    meetings: Arc<dyn MeetingStore>,
    policy: CapacityPolicy,
    max_retries: u32,
}

impl fmt::Debug for MeetingCapacityAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeetingCapacityAllocator")
            .field("policy", &self.policy)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl MeetingCapacityAllocator {
    /// Create an allocator over the given meeting store
    pub fn new(meetings: Arc<dyn MeetingStore>, policy: CapacityPolicy) -> Self {
        Self {
            meetings,
            policy,
            max_retries: DEFAULT_RESERVATION_RETRIES,
        }
    }

    /// Override the number of conflict retries
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Configured enforcement policy
    pub const fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    /// Fetch a meeting, treating a missing one as an integrity error
    pub async fn get(&self, id: &MeetingId) -> Result<Meeting, ApplicationError> {
        self.meetings
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::unknown("meeting", id))
    }

    /// All meetings, earliest first, with their remaining capacity
    #[instrument(skip(self))]
    pub async fn slots(&self) -> Result<Vec<MeetingSlot>, ApplicationError> {
        let meetings = self.meetings.list().await?;
        Ok(sorted_by_date(&meetings)
            .into_iter()
            .cloned()
            .map(MeetingSlot::from)
            .collect())
    }

    /// Default meeting to offer when approving
    ///
    /// Re-reads the store on every call.
    #[instrument(skip(self))]
    pub async fn select_default(&self) -> Result<Option<MeetingId>, ApplicationError> {
        let meetings = self.meetings.list().await?;
        let selected = domain::select_default(&meetings);
        debug!(selected = ?selected, candidates = meetings.len(), "Selected default meeting");
        Ok(selected)
    }

    /// Whether both lanes of the meeting are at quota
    pub async fn is_full(&self, id: &MeetingId) -> Result<bool, ApplicationError> {
        Ok(self.get(id).await?.is_full())
    }

    /// Take one slot in the given lane
    ///
    /// Fails with `CapacityExceeded` if the lane is at quota, regardless of
    /// policy.
    #[instrument(skip_all, fields(meeting_id = %id, method = %method))]
    pub async fn reserve(
        &self,
        id: &MeetingId,
        method: ReviewMethod,
    ) -> Result<Meeting, ApplicationError> {
        self.update_counter(id, method, |meeting| meeting.reserve(method))
            .await
    }

    /// Route an approval through the given lane under the configured policy
    ///
    /// With the soft policy a full lane yields [`Reservation::OverQuota`] and
    /// leaves the counter untouched; with the hard policy it fails.
    #[instrument(skip_all, fields(meeting_id = %id, method = %method, policy = %self.policy))]
    pub async fn reserve_with_policy(
        &self,
        id: &MeetingId,
        method: ReviewMethod,
    ) -> Result<Reservation, ApplicationError> {
        match self.reserve(id, method).await {
            Ok(meeting) => Ok(Reservation::Reserved(meeting)),
            Err(e) if e.is_capacity_exceeded() && self.policy == CapacityPolicy::Soft => {
                let warning = self.get(id).await?.over_quota(method);
                warn!(%warning, "Routing approval to a lane already at quota");
                Ok(Reservation::OverQuota(warning))
            },
            Err(e) => Err(e),
        }
    }

    /// Give back a slot taken by [`reserve`](Self::reserve)
    #[instrument(skip_all, fields(meeting_id = %id, method = %method))]
    pub async fn release(
        &self,
        id: &MeetingId,
        method: ReviewMethod,
    ) -> Result<(), ApplicationError> {
        self.update_counter(id, method, |meeting| {
            meeting.release(method);
            Ok(())
        })
        .await?;
        info!("Released meeting slot");
        Ok(())
    }

    async fn update_counter<F>(
        &self,
        id: &MeetingId,
        method: ReviewMethod,
        change: F,
    ) -> Result<Meeting, ApplicationError>
    where
        F: Fn(&mut Meeting) -> Result<(), DomainError> + Send + Sync,
    {
        for attempt in 0..=self.max_retries {
            let current = self.get(id).await?;
            let mut updated = current.clone();
            change(&mut updated)?;

            if self
                .meetings
                .compare_and_swap(&updated, current.version())
                .await?
            {
                debug!(
                    count = updated.count(method),
                    limit = updated.limit(method),
                    "Meeting counter updated"
                );
                return Ok(updated);
            }

            debug!(attempt, "Meeting changed concurrently, retrying");
        }

        warn!(retries = self.max_retries, "Giving up on contended meeting");
        Err(ApplicationError::Conflict(format!(
            "meeting {id} kept changing while updating its {method} counter"
        )))
    }
}
