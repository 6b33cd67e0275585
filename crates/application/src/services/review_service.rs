//! Review Service - The review state machine for a single item
//!
//! Validates and applies `pending -> approved | returned | revision-requested`
//! transitions. Each transition validates its input, consults the capacity
//! allocator (approval only), appends an audit record, stores the item and
//! notifies observers, in that order and without interleaving.

use std::sync::Arc;

use domain::{
    CapacityWarning, DomainError, ItemId, ItemKind, MeetingId, ReviewCommand, ReviewMethod,
    ReviewRecord, ReviewRouting, ReviewStatus, ReviewableItem, require_comment,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::{
    audit_trail::AuditTrailRecorder,
    capacity_allocator::{CapacityPolicy, MeetingCapacityAllocator, MeetingSlot, Reservation},
    observer_registry::{ObserverRegistry, SubscriptionId},
};
use crate::{
    error::ApplicationError,
    ports::{ReviewItemStore, ReviewObserver, TransitionNotification},
};

/// What the approval surface needs when it is opened for an item
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalPrompt {
    /// The pending item
    pub item: ReviewableItem,
    /// Meetings earliest first, with remaining capacity
    pub meetings: Vec<MeetingSlot>,
    /// Meeting to preselect
    pub default_meeting: Option<MeetingId>,
    /// Whether a full lane blocks approval
    pub policy: CapacityPolicy,
}

/// Result of a successful terminal transition
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The item as stored after the transition
    pub item: ReviewableItem,
    /// The notification delivered to observers
    pub notification: TransitionNotification,
}

impl TransitionOutcome {
    /// Over-quota warning for soft-enforced approvals
    pub const fn capacity_warning(&self) -> Option<CapacityWarning> {
        self.notification.capacity_warning
    }
}

/// Which negative decision is being taken
#[derive(Debug, Clone, Copy)]
enum Decline {
    Return,
    Revision,
}

/// Service applying reviewer decisions to items
pub struct ReviewService {
    items: Arc<dyn ReviewItemStore>,
    allocator: Arc<MeetingCapacityAllocator>,
    recorder: AuditTrailRecorder,
    observers: ObserverRegistry,
}

impl std::fmt::Debug for ReviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewService")
            .field("allocator", &self.allocator)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl ReviewService {
    /// Create a new review service
    pub fn new(items: Arc<dyn ReviewItemStore>, allocator: Arc<MeetingCapacityAllocator>) -> Self {
        Self {
            items,
            allocator,
            recorder: AuditTrailRecorder::new(),
            observers: ObserverRegistry::new(),
        }
    }

    /// The capacity allocator used for approvals
    pub fn allocator(&self) -> &MeetingCapacityAllocator {
        &self.allocator
    }

    /// Register an observer for terminal transitions
    pub fn subscribe(&self, observer: Arc<dyn ReviewObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    /// Remove a previously registered observer
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Register a new item in `pending`
    #[instrument(skip(self, title), fields(kind = %kind))]
    pub async fn register(
        &self,
        kind: ItemKind,
        title: &str,
        actor: &str,
    ) -> Result<ReviewableItem, ApplicationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title required").into());
        }

        let item = ReviewableItem::new(kind, title, actor);
        self.items.insert(&item).await?;

        info!(item_id = %item.id(), "Registered item for review");
        Ok(item)
    }

    /// Get an item by ID
    pub async fn get(&self, id: &ItemId) -> Result<ReviewableItem, ApplicationError> {
        self.items
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::unknown("item", id))
    }

    /// List items, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<ReviewableItem>, ApplicationError> {
        match status {
            Some(status) => self.items.list_by_status(status).await,
            None => self.items.list().await,
        }
    }

    /// Open the approval surface for an item
    ///
    /// Meeting data is re-read on every call. Refused once the item has left
    /// `pending`, so the action surface is never offered for a decided cycle.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn open_approval(&self, id: &ItemId) -> Result<ApprovalPrompt, ApplicationError> {
        let item = self.get(id).await?;
        item.ensure_pending()?;

        let meetings = self.allocator.slots().await?;
        let default_meeting = self.allocator.select_default().await?;

        Ok(ApprovalPrompt {
            item,
            meetings,
            default_meeting,
            policy: self.allocator.policy(),
        })
    }

    /// Approve an item and route it through a meeting lane
    ///
    /// `meeting_id` of `None` models an empty selection and fails validation.
    #[instrument(skip(self, comment), fields(item_id = %id, method = %method))]
    pub async fn approve(
        &self,
        id: &ItemId,
        actor: &str,
        method: ReviewMethod,
        meeting_id: Option<MeetingId>,
        comment: Option<&str>,
    ) -> Result<TransitionOutcome, ApplicationError> {
        let Some(meeting_id) = meeting_id else {
            return Err(DomainError::validation("meeting selection required").into());
        };

        let mut item = self.get(id).await?;
        item.ensure_pending()?;
        let read_version = item.version();

        let reservation = self.allocator.reserve_with_policy(&meeting_id, method).await?;

        item.mark_approved(ReviewRouting::new(method, meeting_id))?;
        let record = self
            .recorder
            .record(&mut item, ReviewRecord::approved(actor, comment.unwrap_or_default()));

        if let Err(e) = self.store(&item, ReviewStatus::Pending, read_version).await {
            self.compensate(&reservation, &meeting_id, method).await;
            return Err(e);
        }

        info!(
            meeting_id = %meeting_id,
            over_quota = !reservation.took_slot(),
            "Item approved"
        );
        Ok(self.finish(item, record, reservation.warning()))
    }

    /// Return an item with required changes
    #[instrument(skip(self, comment), fields(item_id = %id))]
    pub async fn reject(
        &self,
        id: &ItemId,
        actor: &str,
        comment: &str,
    ) -> Result<TransitionOutcome, ApplicationError> {
        self.decline(id, actor, comment, Decline::Return).await
    }

    /// Ask for a revision of an item
    #[instrument(skip(self, comment), fields(item_id = %id))]
    pub async fn request_revision(
        &self,
        id: &ItemId,
        actor: &str,
        comment: &str,
    ) -> Result<TransitionOutcome, ApplicationError> {
        self.decline(id, actor, comment, Decline::Revision).await
    }

    /// Apply a reviewer command to a single item
    pub async fn apply(
        &self,
        id: &ItemId,
        actor: &str,
        command: &ReviewCommand,
    ) -> Result<TransitionOutcome, ApplicationError> {
        match command {
            ReviewCommand::Approve {
                method,
                meeting_id,
                comment,
            } => {
                self.approve(id, actor, *method, *meeting_id, comment.as_deref())
                    .await
            },
            ReviewCommand::Reject { comment } => self.reject(id, actor, comment).await,
            ReviewCommand::RequestRevision { comment } => {
                self.request_revision(id, actor, comment).await
            },
        }
    }

    /// Re-open a decided item into a fresh pending cycle
    ///
    /// Prior history is preserved; routing is cleared. Meeting slots taken by
    /// the previous approval are not given back.
    #[instrument(skip(self, comment), fields(item_id = %id))]
    pub async fn resubmit(
        &self,
        id: &ItemId,
        actor: &str,
        comment: &str,
    ) -> Result<ReviewableItem, ApplicationError> {
        let mut item = self.get(id).await?;
        let (read_status, read_version) = (item.status(), item.version());
        item.reopen()?;
        self.recorder
            .append(&mut item, ReviewRecord::submitted(actor, comment));
        self.store(&item, read_status, read_version).await?;

        info!(cycle = item.cycle(), "Item resubmitted");
        Ok(item)
    }

    /// Full history of an item, oldest first
    pub async fn history(&self, id: &ItemId) -> Result<Vec<ReviewRecord>, ApplicationError> {
        Ok(self.get(id).await?.history().records().to_vec())
    }

    /// User-facing label for the item's most recent action
    pub async fn latest_status_label(&self, id: &ItemId) -> Result<&'static str, ApplicationError> {
        Ok(AuditTrailRecorder::latest_status_label(&self.get(id).await?))
    }

    async fn decline(
        &self,
        id: &ItemId,
        actor: &str,
        comment: &str,
        decline: Decline,
    ) -> Result<TransitionOutcome, ApplicationError> {
        let comment = require_comment(comment)?;

        let mut item = self.get(id).await?;
        let read_version = item.version();
        let record = match decline {
            Decline::Return => {
                item.mark_returned()?;
                ReviewRecord::returned(actor, comment)
            },
            Decline::Revision => {
                item.mark_revision_requested()?;
                ReviewRecord::revision_requested(actor, comment)
            },
        };
        let record = self.recorder.record(&mut item, record);
        self.store(&item, ReviewStatus::Pending, read_version).await?;

        info!(status = %item.status(), "Item declined");
        Ok(self.finish(item, record, None))
    }

    /// Write back a transition taken from `read_status` at `read_version`
    ///
    /// Losing a race to a writer that moved the item to another status
    /// is reported as the transition that writer made impossible.
    async fn store(
        &self,
        item: &ReviewableItem,
        read_status: ReviewStatus,
        read_version: u64,
    ) -> Result<(), ApplicationError> {
        match self.items.update(item, read_version).await {
            Err(ApplicationError::Conflict(reason)) => {
                let current = self.get(&item.id()).await?;
                warn!(
                    item_id = %item.id(),
                    current = %current.status(),
                    "Item changed while deciding"
                );
                if current.status() == read_status {
                    return Err(ApplicationError::Conflict(reason));
                }
                Err(DomainError::InvalidTransition {
                    from: current.status(),
                }
                .into())
            },
            other => other,
        }
    }

    async fn compensate(
        &self,
        reservation: &Reservation,
        meeting_id: &MeetingId,
        method: ReviewMethod,
    ) {
        if !reservation.took_slot() {
            return;
        }
        warn!(meeting_id = %meeting_id, "Approval not stored, releasing meeting slot");
        if let Err(e) = self.allocator.release(meeting_id, method).await {
            error!(
                meeting_id = %meeting_id,
                error = %e,
                "Failed to release meeting slot after aborted approval"
            );
        }
    }

    fn finish(
        &self,
        item: ReviewableItem,
        new_record: ReviewRecord,
        capacity_warning: Option<CapacityWarning>,
    ) -> TransitionOutcome {
        let notification = TransitionNotification {
            item_id: item.id(),
            status: item.status(),
            new_record,
            hide_active_panel: AuditTrailRecorder::hides_active_panel(&item),
            capacity_warning,
        };
        self.observers.notify(&notification);

        TransitionOutcome { item, notification }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use domain::{CHANGES_REQUIRED_MARKER, ReviewAction, ReviewPanel};
    use parking_lot::Mutex;

    use super::*;
    use crate::testing::{FakeItemStore, FakeMeetingStore, march_meetings, meeting};

    struct Fixture {
        service: ReviewService,
        items: Arc<FakeItemStore>,
        meetings: Arc<FakeMeetingStore>,
    }

    fn fixture(policy: CapacityPolicy) -> Fixture {
        let items = FakeItemStore::with(vec![]);
        let meetings = FakeMeetingStore::with(march_meetings());
        let allocator = Arc::new(MeetingCapacityAllocator::new(meetings.clone(), policy));
        Fixture {
            service: ReviewService::new(items.clone(), allocator),
            items,
            meetings,
        }
    }

    async fn pending(fx: &Fixture) -> ItemId {
        fx.service
            .register(ItemKind::Project, "Sleep study", "alice")
            .await
            .unwrap()
            .id()
    }

    fn recorded(service: &ReviewService) -> Arc<Mutex<Vec<TransitionNotification>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        service.subscribe(Arc::new(move |n: &TransitionNotification| {
            sink.lock().push(n.clone());
        }));
        seen
    }

    #[tokio::test]
    async fn register_creates_pending_item_with_created_record() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let item = fx.items.stored(&id).unwrap();
        assert_eq!(item.status(), ReviewStatus::Pending);
        assert_eq!(item.history().len(), 1);
        assert_eq!(item.history().records()[0].action, ReviewAction::Created);
    }

    #[tokio::test]
    async fn register_requires_title() {
        let fx = fixture(CapacityPolicy::Soft);
        let err = fx
            .service
            .register(ItemKind::Project, "   ", "alice")
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(fx.items.items.lock().is_empty());
    }

    #[tokio::test]
    async fn open_approval_preselects_earliest_meeting_with_room() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let prompt = fx.service.open_approval(&id).await.unwrap();
        assert_eq!(prompt.default_meeting, Some(MeetingId::new(2)));
        assert_eq!(prompt.meetings.len(), 2);
        assert!(prompt.meetings[0].is_full);
        assert_eq!(prompt.meetings[1].quick_remaining, 4);
    }

    #[tokio::test]
    async fn open_approval_refused_for_decided_item() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;
        fx.service.reject(&id, "bob", "Fix budget").await.unwrap();

        let err = fx.service.open_approval(&id).await.unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[tokio::test]
    async fn approve_routes_item_and_takes_slot() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;
        let seen = recorded(&fx.service);

        let outcome = fx
            .service
            .approve(&id, "bob", ReviewMethod::Quick, Some(MeetingId::new(2)), None)
            .await
            .unwrap();

        assert_eq!(outcome.item.status(), ReviewStatus::Approved);
        assert_eq!(outcome.item.review_method(), Some(ReviewMethod::Quick));
        assert_eq!(outcome.item.panel(), ReviewPanel::History);
        assert!(outcome.capacity_warning().is_none());

        let stored = fx.meetings.stored(MeetingId::new(2)).unwrap();
        assert_eq!(stored.count(ReviewMethod::Quick), 2);
        assert_eq!(stored.count(ReviewMethod::Meeting), 2);

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].status, ReviewStatus::Approved);
        assert!(seen[0].hide_active_panel);
        assert_eq!(seen[0].new_record.action, ReviewAction::Approved);
    }

    #[tokio::test]
    async fn notification_carries_record_as_stored() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let outcome = fx
            .service
            .approve(
                &id,
                "bob",
                ReviewMethod::Meeting,
                Some(MeetingId::new(2)),
                Some("  looks good \n"),
            )
            .await
            .unwrap();

        let record = &outcome.notification.new_record;
        assert_eq!(record.actor, "bob");
        assert_eq!(record.comment, "looks good");
        assert_eq!(Some(record), fx.items.stored(&id).unwrap().history().latest());
    }

    #[tokio::test]
    async fn approve_without_meeting_fails_validation_and_leaves_state() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let err = fx
            .service
            .approve(&id, "bob", ReviewMethod::Meeting, None, None)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let item = fx.items.stored(&id).unwrap();
        assert_eq!(item.status(), ReviewStatus::Pending);
        assert_eq!(item.history().len(), 1);
        assert_eq!(
            fx.meetings
                .stored(MeetingId::new(2))
                .unwrap()
                .count(ReviewMethod::Meeting),
            2
        );
    }

    #[tokio::test]
    async fn approve_with_unknown_meeting_is_integrity_error() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let err = fx
            .service
            .approve(&id, "bob", ReviewMethod::Quick, Some(MeetingId::new(99)), None)
            .await
            .unwrap_err();
        assert!(err.is_integrity());
        assert!(fx.items.stored(&id).unwrap().is_pending());
    }

    #[tokio::test]
    async fn soft_policy_approves_over_quota_with_warning() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let outcome = fx
            .service
            .approve(&id, "bob", ReviewMethod::Quick, Some(MeetingId::new(1)), None)
            .await
            .unwrap();

        assert_eq!(outcome.item.status(), ReviewStatus::Approved);
        let warning = outcome.capacity_warning().unwrap();
        assert_eq!(warning.meeting_id, MeetingId::new(1));
        assert_eq!(warning.limit, 5);

        let stored = fx.meetings.stored(MeetingId::new(1)).unwrap();
        assert_eq!(stored.count(ReviewMethod::Quick), 5);
    }

    #[tokio::test]
    async fn hard_policy_refuses_full_lane_without_mutation() {
        let fx = fixture(CapacityPolicy::Hard);
        let id = pending(&fx).await;
        let seen = recorded(&fx.service);

        let err = fx
            .service
            .approve(&id, "bob", ReviewMethod::Quick, Some(MeetingId::new(1)), None)
            .await
            .unwrap_err();

        assert!(err.is_capacity_exceeded());
        assert!(fx.items.stored(&id).unwrap().is_pending());
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_item_write_gives_slot_back() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;
        fx.items.fail_updates.store(true, Ordering::SeqCst);
        let seen = recorded(&fx.service);

        let err = fx
            .service
            .approve(&id, "bob", ReviewMethod::Meeting, Some(MeetingId::new(2)), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Storage(_)));
        let stored = fx.meetings.stored(MeetingId::new(2)).unwrap();
        assert_eq!(stored.count(ReviewMethod::Meeting), 2);
        assert!(fx.items.stored(&id).unwrap().is_pending());
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn reject_requires_comment_before_any_change() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let err = fx.service.reject(&id, "bob", "  \n ").await.unwrap_err();
        assert!(err.is_validation());

        let item = fx.items.stored(&id).unwrap();
        assert!(item.is_pending());
        assert_eq!(item.history().len(), 1);
    }

    #[tokio::test]
    async fn reject_records_changes_required_details() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let outcome = fx
            .service
            .reject(&id, "bob", "  Fix budget  ")
            .await
            .unwrap();

        assert_eq!(outcome.item.status(), ReviewStatus::Returned);
        let record = outcome.item.history().latest().unwrap();
        assert_eq!(&outcome.notification.new_record, record);
        assert_eq!(record.comment, "Fix budget");
        assert_eq!(
            record.details.as_deref(),
            Some(format!("{CHANGES_REQUIRED_MARKER}Fix budget").as_str())
        );
        assert_eq!(
            fx.service.latest_status_label(&id).await.unwrap(),
            "Returned for changes"
        );
    }

    #[tokio::test]
    async fn request_revision_moves_to_revision_requested() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let outcome = fx
            .service
            .request_revision(&id, "bob", "Add consent form")
            .await
            .unwrap();

        assert_eq!(outcome.item.status(), ReviewStatus::RevisionRequested);
        assert!(outcome.notification.hide_active_panel);
    }

    #[tokio::test]
    async fn terminal_items_refuse_every_decision() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;
        fx.service
            .approve(&id, "bob", ReviewMethod::Quick, Some(MeetingId::new(2)), None)
            .await
            .unwrap();
        let before = fx.items.stored(&id).unwrap();

        let commands = [
            ReviewCommand::approve(ReviewMethod::Meeting, MeetingId::new(2)),
            ReviewCommand::reject("Too late"),
            ReviewCommand::request_revision("Too late"),
        ];
        for command in &commands {
            let err = fx.service.apply(&id, "carol", command).await.unwrap_err();
            assert!(err.is_invalid_transition(), "{command:?}");
        }

        assert_eq!(fx.items.stored(&id).unwrap(), before);
        assert_eq!(
            fx.meetings
                .stored(MeetingId::new(2))
                .unwrap()
                .count(ReviewMethod::Meeting),
            2
        );
    }

    #[tokio::test]
    async fn history_grows_by_exactly_one_per_transition() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        fx.service
            .request_revision(&id, "bob", "Shorten abstract")
            .await
            .unwrap();
        let history = fx.service.history(&id).await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].action, ReviewAction::RevisionRequested);
        assert!(history[0].timestamp <= history[1].timestamp);
    }

    #[tokio::test]
    async fn resubmit_opens_new_cycle_and_keeps_history() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;
        fx.service.reject(&id, "bob", "Fix budget").await.unwrap();

        let item = fx
            .service
            .resubmit(&id, "alice", "Budget fixed")
            .await
            .unwrap();

        assert!(item.is_pending());
        assert_eq!(item.cycle(), 2);
        assert_eq!(item.history().len(), 3);
        assert_eq!(item.history().current_cycle().len(), 1);
        assert!(item.routing().is_none());

        fx.service
            .approve(&id, "bob", ReviewMethod::Quick, Some(MeetingId::new(2)), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn resubmit_refused_while_pending() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let err = fx.service.resubmit(&id, "alice", "again").await.unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[tokio::test]
    async fn unsubscribed_observer_is_not_called() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;
        let seen = Arc::new(Mutex::new(0_usize));
        let sink = seen.clone();
        let sub = fx.service.subscribe(Arc::new(move |_: &TransitionNotification| {
            *sink.lock() += 1;
        }));

        assert!(fx.service.unsubscribe(sub));
        fx.service.reject(&id, "bob", "No").await.unwrap();
        assert_eq!(*seen.lock(), 0);
    }

    #[tokio::test]
    async fn unknown_item_is_integrity_error() {
        let fx = fixture(CapacityPolicy::Soft);
        let err = fx.service.get(&ItemId::new()).await.unwrap_err();
        assert!(err.is_integrity());
    }

    #[tokio::test]
    async fn last_slot_goes_to_one_of_two_concurrent_approvals() {
        let items = FakeItemStore::with(vec![]);
        let meetings = FakeMeetingStore::with(vec![meeting(3, "2025-04-01", (4, 5), (0, 8))]);
        let allocator = Arc::new(MeetingCapacityAllocator::new(
            meetings.clone(),
            CapacityPolicy::Hard,
        ));
        let service = Arc::new(ReviewService::new(items, allocator));

        let a = service
            .register(ItemKind::Project, "A", "alice")
            .await
            .unwrap()
            .id();
        let b = service
            .register(ItemKind::Project, "B", "alice")
            .await
            .unwrap()
            .id();

        let (ra, rb) = tokio::join!(
            service.approve(&a, "bob", ReviewMethod::Quick, Some(MeetingId::new(3)), None),
            service.approve(&b, "carol", ReviewMethod::Quick, Some(MeetingId::new(3)), None),
        );

        assert_eq!(u8::from(ra.is_ok()) + u8::from(rb.is_ok()), 1);
        let stored = meetings.stored(MeetingId::new(3)).unwrap();
        assert_eq!(stored.count(ReviewMethod::Quick), 5);
    }

    #[tokio::test]
    async fn same_item_approved_twice_concurrently_takes_one_slot() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;
        let seen = recorded(&fx.service);

        let (ra, rb) = tokio::join!(
            fx.service
                .approve(&id, "bob", ReviewMethod::Quick, Some(MeetingId::new(2)), None),
            fx.service
                .approve(&id, "carol", ReviewMethod::Quick, Some(MeetingId::new(2)), None),
        );

        assert_eq!(u8::from(ra.is_ok()) + u8::from(rb.is_ok()), 1);
        let lost = ra.err().or(rb.err()).unwrap();
        assert!(lost.is_invalid_transition(), "{lost}");

        let stored = fx.meetings.stored(MeetingId::new(2)).unwrap();
        assert_eq!(stored.count(ReviewMethod::Quick), 2);
        let item = fx.items.stored(&id).unwrap();
        assert_eq!(item.history().len(), 2);
        assert_eq!(item.version(), 1);
        assert_eq!(seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn approval_losing_to_concurrent_rejection_gives_slot_back() {
        let fx = fixture(CapacityPolicy::Soft);
        let id = pending(&fx).await;

        let (rejected, approved) = tokio::join!(
            fx.service.reject(&id, "bob", "Fix budget"),
            fx.service
                .approve(&id, "carol", ReviewMethod::Quick, Some(MeetingId::new(2)), None),
        );

        rejected.unwrap();
        assert!(approved.unwrap_err().is_invalid_transition());

        let stored = fx.meetings.stored(MeetingId::new(2)).unwrap();
        assert_eq!(stored.count(ReviewMethod::Quick), 1);
        let item = fx.items.stored(&id).unwrap();
        assert_eq!(item.status(), ReviewStatus::Returned);
        assert!(item.routing().is_none());
        assert_eq!(item.history().len(), 2);
    }
}
