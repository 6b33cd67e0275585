//! Audit trail - Append-only history of an item's review records

use serde::{Deserialize, Serialize};

use super::review_record::{ReviewAction, ReviewRecord};

/// Ordered, append-only sequence of review records
///
/// Insertion order is chronological order. There is deliberately no API to
/// remove, reorder or mutate a record once it has been appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail(Vec<ReviewRecord>);

impl AuditTrail {
    /// Create an empty trail
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a record to the tail and return the full history
    pub fn append(&mut self, record: ReviewRecord) -> &[ReviewRecord] {
        self.0.push(record);
        &self.0
    }

    /// All records, oldest first
    pub fn records(&self) -> &[ReviewRecord] {
        &self.0
    }

    /// The most recent record
    pub fn latest(&self) -> Option<&ReviewRecord> {
        self.0.last()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the trail has no records
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Records belonging to the current review cycle
    ///
    /// A cycle starts at the most recent `created` or `submitted` record.
    pub fn current_cycle(&self) -> &[ReviewRecord] {
        let start = self
            .0
            .iter()
            .rposition(|r| r.action.opens_cycle())
            .unwrap_or(0);
        &self.0[start..]
    }

    /// User-facing label for the most recent action
    pub fn latest_status_label(&self) -> &'static str {
        match self.latest().map(|r| r.action) {
            None => "Not submitted",
            Some(ReviewAction::Created | ReviewAction::Submitted) => "Pending review",
            Some(ReviewAction::Approved) => "Approved",
            Some(ReviewAction::Returned) => "Returned for changes",
            Some(ReviewAction::RevisionRequested) => "Revision requested",
        }
    }

    /// Whether the most recent action closed the review cycle
    pub fn hides_active_panel(&self) -> bool {
        self.latest()
            .is_some_and(|r| r.action.resulting_status().is_terminal())
    }

    /// Iterate over records, oldest first
    pub fn iter(&self) -> std::slice::Iter<'_, ReviewRecord> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a AuditTrail {
    type Item = &'a ReviewRecord;
    type IntoIter = std::slice::Iter<'a, ReviewRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
