//! Reviewable item entity - Anything that passes through the approval workflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{audit_trail::AuditTrail, review_record::ReviewRecord};
use crate::{
    errors::DomainError,
    value_objects::{ItemId, ItemKind, ReviewMethod, ReviewPanel, ReviewRouting, ReviewStatus},
};

/// A project, tracking report, equipment booking or reagent request under review
///
/// State only changes through the transition methods below, which enforce the
/// `pending -> approved | returned | revision-requested` lifecycle. History is
/// append-only via [`ReviewableItem::record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewableItem {
    id: ItemId,
    kind: ItemKind,
    title: String,
    status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    routing: Option<ReviewRouting>,
    /// 1-based review cycle, incremented on each resubmission
    cycle: u32,
    history: AuditTrail,
    /// Bumped on every status change, used to guard concurrent writers
    #[serde(default)]
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReviewableItem {
    /// Register a new pending item, recording who created it
    pub fn new(kind: ItemKind, title: impl Into<String>, actor: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut history = AuditTrail::new();
        history.append(ReviewRecord::created(actor).with_timestamp(now));

        Self {
            id: ItemId::new(),
            kind,
            title: title.into(),
            status: ReviewStatus::Pending,
            routing: None,
            cycle: 1,
            history,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub const fn id(&self) -> ItemId {
        self.id
    }

    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn status(&self) -> ReviewStatus {
        self.status
    }

    /// Lane and meeting, set only once approved in the current cycle
    pub const fn routing(&self) -> Option<ReviewRouting> {
        self.routing
    }

    /// Review lane, `None` while unset
    pub fn review_method(&self) -> Option<ReviewMethod> {
        self.routing.map(|r| r.method)
    }

    pub const fn cycle(&self) -> u32 {
        self.cycle
    }

    pub const fn history(&self) -> &AuditTrail {
        &self.history
    }

    /// Status changes applied since registration
    pub const fn version(&self) -> u64 {
        self.version
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the reviewer action panel may be offered
    pub const fn panel(&self) -> ReviewPanel {
        self.status.panel()
    }

    /// Whether the item is awaiting a decision
    pub fn is_pending(&self) -> bool {
        self.status == ReviewStatus::Pending
    }

    /// Fail unless the item is awaiting a decision
    pub fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition { from: self.status })
        }
    }

    /// Append a record to the history
    pub fn record(&mut self, record: ReviewRecord) -> &[ReviewRecord] {
        self.updated_at = record.timestamp.max(self.updated_at);
        self.history.append(record)
    }

    /// Approve and route through a meeting lane
    pub fn mark_approved(&mut self, routing: ReviewRouting) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.routing = Some(routing);
        self.settle(ReviewStatus::Approved);
        Ok(())
    }

    /// Return to the submitter with required changes
    pub fn mark_returned(&mut self) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.settle(ReviewStatus::Returned);
        Ok(())
    }

    /// Ask the submitter for a revision
    pub fn mark_revision_requested(&mut self) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.settle(ReviewStatus::RevisionRequested);
        Ok(())
    }

    /// Re-open a decided item into a fresh pending cycle
    ///
    /// Routing is cleared; history is kept.
    pub fn reopen(&mut self) -> Result<(), DomainError> {
        if !self.status.is_terminal() {
            return Err(DomainError::InvalidTransition { from: self.status });
        }
        self.routing = None;
        self.cycle += 1;
        self.settle(ReviewStatus::Pending);
        Ok(())
    }

    fn settle(&mut self, status: ReviewStatus) {
        self.status = status;
        self.version += 1;
        self.updated_at = Utc::now();
    }
}
