//! Meeting provisioning data.

use chrono::NaiveDate;
use domain::{Meeting, MeetingId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ConfigError;

/// One configured committee meeting
///
/// ```toml
/// [[meetings]]
/// id = 2
/// date = "2025-03-15"
/// title = "March committee"
/// quick_review_count = 1
/// quick_review_limit = 5
/// meeting_review_count = 2
/// meeting_review_limit = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MeetingConfig {
    pub id: u64,

    pub date: NaiveDate,

    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,

    #[serde(default)]
    pub quick_review_count: u32,

    #[serde(default)]
    pub meeting_review_count: u32,

    pub quick_review_limit: u32,

    pub meeting_review_limit: u32,
}

impl MeetingConfig {
    /// Validate and convert into a domain meeting
    pub fn to_meeting(&self) -> Result<Meeting, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidMeeting {
            id: self.id,
            reason,
        };

        self.validate().map_err(|e| invalid(e.to_string()))?;

        Meeting::new(
            MeetingId::new(self.id),
            self.date,
            self.title.trim(),
            self.quick_review_limit,
            self.meeting_review_limit,
        )
        .with_counts(self.quick_review_count, self.meeting_review_count)
        .map_err(|e| invalid(e.to_string()))
    }
}
