//! Audit trail recorder - Appends review records to an item's history

use domain::{ReviewRecord, ReviewableItem};
use tracing::debug;

/// Appends records to item histories and derives labels from them
///
/// Records are appended to the tail and never reordered or removed. A record
/// whose timestamp predates the current tail is clamped to the tail's
/// timestamp so that insertion order and chronological order agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditTrailRecorder;

impl AuditTrailRecorder {
    /// Create a recorder
    pub const fn new() -> Self {
        Self
    }

    /// Append `record` to the item's history and return the updated history
    pub fn append<'a>(
        &self,
        item: &'a mut ReviewableItem,
        record: ReviewRecord,
    ) -> &'a [ReviewRecord] {
        self.record(item, record);
        item.history().records()
    }

    /// Append `record` and return it as stored
    ///
    /// The timestamp never goes backwards along the trail and the comment
    /// is trimmed.
    pub fn record(&self, item: &mut ReviewableItem, mut record: ReviewRecord) -> ReviewRecord {
        if let Some(latest) = item.history().latest() {
            if record.timestamp < latest.timestamp {
                record.timestamp = latest.timestamp;
            }
        }
        record.comment = record.comment.trim().to_string();

        debug!(
            item_id = %item.id(),
            action = %record.action,
            actor = %record.actor,
            "Appending review record"
        );
        item.record(record.clone());
        record
    }

    /// User-facing label for the item's most recent action
    pub fn latest_status_label(item: &ReviewableItem) -> &'static str {
        item.history().latest_status_label()
    }

    /// Whether the active review panel should be hidden for the item
    pub fn hides_active_panel(item: &ReviewableItem) -> bool {
        item.history().hides_active_panel()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use domain::{ItemKind, ReviewAction};

    use super::*;

    fn item() -> ReviewableItem {
        ReviewableItem::new(ItemKind::TrackingReport, "Q1 tracking", "alice")
    }

    #[test]
    fn append_adds_to_tail() {
        let recorder = AuditTrailRecorder::new();
        let mut item = item();

        let history = recorder.append(&mut item, ReviewRecord::returned("bob", "Add data"));

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].action, ReviewAction::Returned);
    }

    #[test]
    fn earlier_timestamp_is_clamped_to_tail() {
        let recorder = AuditTrailRecorder::new();
        let mut item = item();
        let tail = item.history().latest().map(|r| r.timestamp).unwrap();
        let stale = ReviewRecord::approved("bob", "").with_timestamp(tail - Duration::hours(1));

        let history = recorder.append(&mut item, stale);

        assert_eq!(history[1].timestamp, tail);
    }

    #[test]
    fn later_timestamp_is_kept() {
        let recorder = AuditTrailRecorder::new();
        let mut item = item();
        let later = Utc::now() + Duration::minutes(5);

        let history = recorder.append(
            &mut item,
            ReviewRecord::approved("bob", "").with_timestamp(later),
        );

        assert_eq!(history[1].timestamp, later);
    }

    #[test]
    fn comment_is_trimmed() {
        let recorder = AuditTrailRecorder::new();
        let mut item = item();

        let history = recorder.append(&mut item, ReviewRecord::approved("bob", "  fine \n"));

        assert_eq!(history[1].comment, "fine");
    }

    #[test]
    fn recorded_entry_matches_stored_tail() {
        let recorder = AuditTrailRecorder::new();
        let mut item = item();
        let tail = item.history().latest().map(|r| r.timestamp).unwrap();
        let stale =
            ReviewRecord::returned("bob", " Add data ").with_timestamp(tail - Duration::hours(1));

        let stored = recorder.record(&mut item, stale);

        assert_eq!(stored.timestamp, tail);
        assert_eq!(stored.comment, "Add data");
        assert_eq!(item.history().latest(), Some(&stored));
    }

    #[test]
    fn label_and_panel_follow_latest_record() {
        let recorder = AuditTrailRecorder::new();
        let mut item = item();
        assert_eq!(AuditTrailRecorder::latest_status_label(&item), "Pending review");
        assert!(!AuditTrailRecorder::hides_active_panel(&item));

        recorder.append(&mut item, ReviewRecord::approved("bob", ""));

        assert_eq!(AuditTrailRecorder::latest_status_label(&item), "Approved");
        assert!(AuditTrailRecorder::hides_active_panel(&item));
    }
}
