//! Human-readable rendering of workflow results

use std::fmt::Write;

use application::{ApprovalPrompt, BatchOutcome, MeetingSlot, TransitionOutcome};
use domain::{MeetingId, ReviewPanel, ReviewRecord, ReviewableItem};

/// One-line summary of an item
pub fn item_line(item: &ReviewableItem) -> String {
    let mut line = format!(
        "{}  {:<18} {:<17} {}",
        item.id(),
        item.status(),
        item.kind(),
        item.title()
    );
    if let Some(routing) = item.routing() {
        let _ = write!(line, "  [{} via meeting {}]", routing.method.label(), routing.meeting_id);
    }
    line
}

/// Item detail with its latest status label
pub fn item_detail(item: &ReviewableItem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", item.title());
    let _ = writeln!(out, "  id:      {}", item.id());
    let _ = writeln!(out, "  kind:    {}", item.kind());
    let _ = writeln!(out, "  status:  {} ({})", item.status(), item.history().latest_status_label());
    let _ = writeln!(out, "  cycle:   {}", item.cycle());
    if let Some(routing) = item.routing() {
        let _ = writeln!(
            out,
            "  routing: {} via meeting {}",
            routing.method.label(),
            routing.meeting_id
        );
    }
    out
}

/// Meeting table with remaining capacity, marking the default meeting
pub fn meetings(slots: &[MeetingSlot], default: Option<MeetingId>) -> String {
    if slots.is_empty() {
        return "No meetings configured\n".to_string();
    }

    let mut out = String::new();
    for slot in slots {
        let meeting = &slot.meeting;
        let marker = if Some(meeting.id()) == default { "*" } else { " " };
        let full = if slot.is_full { "  FULL" } else { "" };
        let _ = writeln!(
            out,
            "{marker} {:>4}  {}  quick {}/{}  meeting {}/{}  {}{full}",
            meeting.id(),
            meeting.date(),
            meeting.count(domain::ReviewMethod::Quick),
            meeting.limit(domain::ReviewMethod::Quick),
            meeting.count(domain::ReviewMethod::Meeting),
            meeting.limit(domain::ReviewMethod::Meeting),
            meeting.title(),
        );
    }
    out
}

/// Approval surface for a pending item
pub fn prompt(prompt: &ApprovalPrompt) -> String {
    let mut out = item_detail(&prompt.item);
    let _ = writeln!(out, "\nApproval options ({} capacity):", prompt.policy);
    out.push_str(&meetings(&prompt.meetings, prompt.default_meeting));
    out
}

/// Audit trail, oldest first
pub fn history(records: &[ReviewRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = write!(
            out,
            "{}  {:<18} {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.action,
            record.actor
        );
        if !record.comment.is_empty() {
            let _ = write!(out, ": {}", record.comment);
        }
        out.push('\n');
        if let Some(details) = &record.details {
            let _ = writeln!(out, "    {details}");
        }
    }
    out
}

/// Result of a single decision
pub fn transition(outcome: &TransitionOutcome) -> String {
    let mut out = format!(
        "{} is now {}\n",
        outcome.item.title(),
        outcome.item.status()
    );
    if let Some(warning) = outcome.capacity_warning() {
        let _ = writeln!(out, "warning: {warning}");
    }
    if outcome.item.panel() == ReviewPanel::History {
        out.push_str("Review closed for this cycle; see `history` for the audit trail\n");
    }
    out
}

/// Batch counts followed by per-item failures and warnings
pub fn batch(outcome: &BatchOutcome) -> String {
    let mut out = format!(
        "{} updated, {} skipped, {} failed\n",
        outcome.mutated_count(),
        outcome.skipped_count(),
        outcome.failed_count()
    );
    for failure in &outcome.failed {
        let _ = writeln!(out, "  {}: {}", failure.item_id, failure.error);
    }
    for warning in &outcome.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    out
}
