//! Meeting entity - A scheduled committee session with two capacity lanes

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{MeetingId, ReviewMethod},
};

/// Notice that an approval was routed to a lane already at its quota
///
/// Produced instead of an error when capacity is enforced softly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityWarning {
    /// Meeting that is over quota
    pub meeting_id: MeetingId,
    /// Lane that is over quota
    pub method: ReviewMethod,
    /// The lane's quota
    pub limit: u32,
}

impl fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Meeting {} has reached its {} quota of {}",
            self.meeting_id, self.method, self.limit
        )
    }
}

/// A committee session that approved items are routed through
///
/// Each meeting has two independent quotas, one per review lane. Counters
/// only change through [`Meeting::reserve`] and [`Meeting::release`], and
/// every change bumps `version` so stores can detect concurrent writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    id: MeetingId,
    date: NaiveDate,
    title: String,
    quick_review_count: u32,
    quick_review_limit: u32,
    meeting_review_count: u32,
    meeting_review_limit: u32,
    #[serde(default)]
    version: u64,
}

impl Meeting {
    /// Create a meeting with empty lanes
    pub fn new(
        id: MeetingId,
        date: NaiveDate,
        title: impl Into<String>,
        quick_review_limit: u32,
        meeting_review_limit: u32,
    ) -> Self {
        Self {
            id,
            date,
            title: title.into(),
            quick_review_count: 0,
            quick_review_limit,
            meeting_review_count: 0,
            meeting_review_limit,
            version: 0,
        }
    }

    /// Set the current lane counters, e.g. when provisioning from configuration
    ///
    /// Fails if either counter exceeds its limit.
    pub fn with_counts(
        mut self,
        quick_review_count: u32,
        meeting_review_count: u32,
    ) -> Result<Self, DomainError> {
        self.quick_review_count = quick_review_count;
        self.meeting_review_count = meeting_review_count;
        self.check_invariants()?;
        Ok(self)
    }

    /// Restore the stored version when loading from a store
    #[must_use]
    pub const fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Verify that no lane is over its limit
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        for method in [ReviewMethod::Quick, ReviewMethod::Meeting] {
            if self.count(method) > self.limit(method) {
                return Err(DomainError::validation(format!(
                    "meeting {} has {} {} reviews but a limit of {}",
                    self.id,
                    self.count(method),
                    method,
                    self.limit(method)
                )));
            }
        }
        Ok(())
    }

    pub const fn id(&self) -> MeetingId {
        self.id
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Items already routed through the given lane
    pub const fn count(&self, method: ReviewMethod) -> u32 {
        match method {
            ReviewMethod::Quick => self.quick_review_count,
            ReviewMethod::Meeting => self.meeting_review_count,
        }
    }

    /// Quota for the given lane
    pub const fn limit(&self, method: ReviewMethod) -> u32 {
        match method {
            ReviewMethod::Quick => self.quick_review_limit,
            ReviewMethod::Meeting => self.meeting_review_limit,
        }
    }

    /// Slots left in the given lane
    pub const fn remaining(&self, method: ReviewMethod) -> u32 {
        self.limit(method).saturating_sub(self.count(method))
    }

    /// Whether the given lane has reached its quota
    pub const fn is_lane_full(&self, method: ReviewMethod) -> bool {
        self.count(method) >= self.limit(method)
    }

    /// A meeting is full only when both lanes are full
    pub const fn is_full(&self) -> bool {
        self.is_lane_full(ReviewMethod::Quick) && self.is_lane_full(ReviewMethod::Meeting)
    }

    /// Take one slot in the given lane
    ///
    /// Leaves the meeting untouched and returns `CapacityExceeded` if the lane
    /// is already at its limit.
    pub fn reserve(&mut self, method: ReviewMethod) -> Result<(), DomainError> {
        if self.is_lane_full(method) {
            return Err(DomainError::CapacityExceeded {
                meeting_id: self.id,
                method,
                limit: self.limit(method),
            });
        }
        *self.counter_mut(method) += 1;
        self.version += 1;
        Ok(())
    }

    /// Give back one slot in the given lane
    ///
    /// Used to compensate a reservation whose approval could not be stored.
    pub fn release(&mut self, method: ReviewMethod) {
        let counter = self.counter_mut(method);
        if *counter > 0 {
            *counter -= 1;
            self.version += 1;
        }
    }

    /// Warning describing this lane as over quota
    pub const fn over_quota(&self, method: ReviewMethod) -> CapacityWarning {
        CapacityWarning {
            meeting_id: self.id,
            method,
            limit: self.limit(method),
        }
    }

    fn counter_mut(&mut self, method: ReviewMethod) -> &mut u32 {
        match method {
            ReviewMethod::Quick => &mut self.quick_review_count,
            ReviewMethod::Meeting => &mut self.meeting_review_count,
        }
    }
}
