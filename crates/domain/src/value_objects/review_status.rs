//! Review status value object
//!
//! Represents where an item stands within its current review cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a reviewable item within the current review cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStatus {
    /// Awaiting a reviewer decision
    #[default]
    Pending,
    /// Approved and routed to a meeting lane
    Approved,
    /// Returned to the submitter with required changes
    Returned,
    /// Submitter asked to revise and resubmit
    RevisionRequested,
}

impl ReviewStatus {
    /// Check if this status closes the current review cycle
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Approved | Self::Returned | Self::RevisionRequested
        )
    }

    /// Stable machine-readable name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Returned => "returned",
            Self::RevisionRequested => "revision-requested",
        }
    }

    /// Panel a reviewer should see for an item in this status
    pub const fn panel(&self) -> ReviewPanel {
        if self.is_terminal() {
            ReviewPanel::History
        } else {
            ReviewPanel::ActiveReview
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "returned" => Ok(Self::Returned),
            "revision-requested" => Ok(Self::RevisionRequested),
            other => Err(format!("Unknown review status: {other}")),
        }
    }
}

/// Which review surface is offered for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPanel {
    /// Approve / return / request-revision actions are available
    ActiveReview,
    /// Only the read-only history is shown
    History,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_not_terminal() {
        assert!(!ReviewStatus::Pending.is_terminal());
        assert_eq!(ReviewStatus::Pending.panel(), ReviewPanel::ActiveReview);
    }

    #[test]
    fn decisions_are_terminal() {
        for status in [
            ReviewStatus::Approved,
            ReviewStatus::Returned,
            ReviewStatus::RevisionRequested,
        ] {
            assert!(status.is_terminal());
            assert_eq!(status.panel(), ReviewPanel::History);
        }
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&ReviewStatus::RevisionRequested).unwrap();
        assert_eq!(json, "\"revision-requested\"");
    }

    #[test]
    fn parses_both_separators() {
        assert_eq!(
            "revision_requested".parse::<ReviewStatus>().unwrap(),
            ReviewStatus::RevisionRequested
        );
        assert_eq!(
            "Approved".parse::<ReviewStatus>().unwrap(),
            ReviewStatus::Approved
        );
        assert!("archived".parse::<ReviewStatus>().is_err());
    }

    #[test]
    fn default_is_pending() {
        assert_eq!(ReviewStatus::default(), ReviewStatus::Pending);
    }
}
