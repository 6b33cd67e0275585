//! Form review gate
//!
//! Some modules pre-screen submissions with a binary pass/fail form check
//! before the full review workflow. The two vocabularies are kept as separate
//! layers and converted explicitly here.

use serde::{Deserialize, Serialize};

use super::ReviewStatus;

/// Outcome of the binary form check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormReviewOutcome {
    /// Form is complete and acceptable
    Pass,
    /// Form is incomplete or unacceptable
    Fail,
}

impl FormReviewOutcome {
    /// Workflow status a form outcome settles an item into
    ///
    /// A failed form check returns the item to the submitter; it never
    /// produces a revision request, which is reserved for reviewer judgement.
    pub const fn to_status(self) -> ReviewStatus {
        match self {
            Self::Pass => ReviewStatus::Approved,
            Self::Fail => ReviewStatus::Returned,
        }
    }

    /// Project a workflow status onto the form gate
    ///
    /// `None` while the item is still pending.
    pub const fn from_status(status: ReviewStatus) -> Option<Self> {
        match status {
            ReviewStatus::Pending => None,
            ReviewStatus::Approved => Some(Self::Pass),
            ReviewStatus::Returned | ReviewStatus::RevisionRequested => Some(Self::Fail),
        }
    }
}
