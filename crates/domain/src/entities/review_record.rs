//! Review record entity - One immutable entry in an item's audit trail

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ReviewStatus;

/// Prefix written in front of the reviewer comment when changes are required
pub const CHANGES_REQUIRED_MARKER: &str = "Changes required: ";

/// What happened to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewAction {
    /// Item was registered for review
    Created,
    /// Item was (re)submitted, opening a new review cycle
    Submitted,
    /// Reviewer approved the item
    Approved,
    /// Reviewer returned the item with required changes
    Returned,
    /// Reviewer asked for a revision
    RevisionRequested,
}

impl ReviewAction {
    /// Status an item is left in after this action
    pub const fn resulting_status(&self) -> ReviewStatus {
        match self {
            Self::Created | Self::Submitted => ReviewStatus::Pending,
            Self::Approved => ReviewStatus::Approved,
            Self::Returned => ReviewStatus::Returned,
            Self::RevisionRequested => ReviewStatus::RevisionRequested,
        }
    }

    /// Whether this action opens a review cycle
    pub const fn opens_cycle(&self) -> bool {
        matches!(self, Self::Created | Self::Submitted)
    }

    /// Stable machine-readable name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Returned => "returned",
            Self::RevisionRequested => "revision-requested",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single audit entry for a reviewable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// When the action was taken
    pub timestamp: DateTime<Utc>,
    /// Human-readable identity of whoever acted
    pub actor: String,
    /// What was done
    pub action: ReviewAction,
    /// Free-text comment, possibly empty
    pub comment: String,
    /// Structured explanation, only for return and revision actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ReviewRecord {
    /// Create a record stamped with the current time
    pub fn new(action: ReviewAction, actor: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            actor: actor.into(),
            action,
            comment: comment.into(),
            details: None,
        }
    }

    /// Record the registration of a new item
    pub fn created(actor: impl Into<String>) -> Self {
        Self::new(ReviewAction::Created, actor, "")
    }

    /// Record a resubmission
    pub fn submitted(actor: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(ReviewAction::Submitted, actor, comment)
    }

    /// Record an approval
    pub fn approved(actor: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(ReviewAction::Approved, actor, comment)
    }

    /// Record a return, carrying the required changes as details
    pub fn returned(actor: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(ReviewAction::Returned, actor, comment).with_changes_required()
    }

    /// Record a revision request, carrying the required changes as details
    pub fn revision_requested(actor: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(ReviewAction::RevisionRequested, actor, comment).with_changes_required()
    }

    /// Override the timestamp
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set explicit details
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn with_changes_required(self) -> Self {
        let comment = self.comment.trim();
        if comment.is_empty() {
            return self;
        }
        let details = format!("{CHANGES_REQUIRED_MARKER}{comment}");
        self.with_details(details)
    }
}
