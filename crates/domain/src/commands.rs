//! Review commands - Strongly typed reviewer decisions

use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{MeetingId, ReviewMethod, ReviewStatus},
};

/// A reviewer decision on a pending item
///
/// The same command can be applied to a single item or shared across a batch
/// selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewCommand {
    /// Approve and route through a meeting lane
    Approve {
        /// Review lane
        method: ReviewMethod,
        /// Meeting to route through; required
        meeting_id: Option<MeetingId>,
        /// Optional reviewer comment
        #[serde(default)]
        comment: Option<String>,
    },

    /// Return the item with required changes
    Reject {
        /// Required explanation of the changes
        comment: String,
    },

    /// Ask for a revision
    RequestRevision {
        /// Required explanation of what to revise
        comment: String,
    },
}

impl ReviewCommand {
    /// Build an approval command
    pub fn approve(method: ReviewMethod, meeting_id: MeetingId) -> Self {
        Self::Approve {
            method,
            meeting_id: Some(meeting_id),
            comment: None,
        }
    }

    /// Build a rejection command
    pub fn reject(comment: impl Into<String>) -> Self {
        Self::Reject {
            comment: comment.into(),
        }
    }

    /// Build a revision request command
    pub fn request_revision(comment: impl Into<String>) -> Self {
        Self::RequestRevision {
            comment: comment.into(),
        }
    }

    /// Status the item ends up in if the command succeeds
    pub const fn target_status(&self) -> ReviewStatus {
        match self {
            Self::Approve { .. } => ReviewStatus::Approved,
            Self::Reject { .. } => ReviewStatus::Returned,
            Self::RequestRevision { .. } => ReviewStatus::RevisionRequested,
        }
    }

    /// Short name for logging
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Reject { .. } => "reject",
            Self::RequestRevision { .. } => "request_revision",
        }
    }

    /// Check required user input without touching any state
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Approve { meeting_id, .. } => {
                if meeting_id.is_none() {
                    return Err(DomainError::validation("meeting selection required"));
                }
                Ok(())
            },
            Self::Reject { comment } | Self::RequestRevision { comment } => {
                require_comment(comment).map(|_| ())
            },
        }
    }
}

/// Trim a reviewer comment, failing if nothing is left
pub fn require_comment(comment: &str) -> Result<&str, DomainError> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("comment required"));
    }
    Ok(trimmed)
}
