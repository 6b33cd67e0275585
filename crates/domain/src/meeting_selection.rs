//! Meeting selection rules
//!
//! Pure functions over a snapshot of meetings. They never mutate counters;
//! reservation happens through [`Meeting::reserve`].

use std::cmp::Ordering;

use crate::{entities::Meeting, value_objects::MeetingId};

/// Meetings ordered by date, earliest first
///
/// Ties are broken by id so the order is deterministic.
pub fn sorted_by_date(meetings: &[Meeting]) -> Vec<&Meeting> {
    let mut sorted: Vec<&Meeting> = meetings.iter().collect();
    sorted.sort_by(|a, b| by_date_then_id(a, b));
    sorted
}

/// Default meeting to offer when approving
///
/// The earliest meeting that is not full, or the earliest meeting overall if
/// every meeting is full. `None` only for an empty list.
pub fn select_default(meetings: &[Meeting]) -> Option<MeetingId> {
    let sorted = sorted_by_date(meetings);
    sorted
        .iter()
        .find(|m| !m.is_full())
        .or_else(|| sorted.first())
        .map(|m| m.id())
}

fn by_date_then_id(a: &Meeting, b: &Meeting) -> Ordering {
    a.date().cmp(&b.date()).then_with(|| a.id().cmp(&b.id()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn meeting(id: u64, date: &str, quick: (u32, u32), full: (u32, u32)) -> Meeting {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Meeting::new(MeetingId::new(id), date, format!("Session {id}"), quick.1, full.1)
            .with_counts(quick.0, full.0)
            .unwrap()
    }

    #[test]
    fn skips_full_earlier_meeting() {
        let meetings = vec![
            meeting(1, "2025-03-01", (5, 5), (8, 8)),
            meeting(2, "2025-03-15", (1, 5), (2, 8)),
        ];
        assert_eq!(select_default(&meetings), Some(MeetingId::new(2)));
    }

    #[test]
    fn sorts_before_selecting() {
        let meetings = vec![
            meeting(3, "2025-04-01", (0, 5), (0, 8)),
            meeting(2, "2025-03-15", (0, 5), (0, 8)),
        ];
        assert_eq!(select_default(&meetings), Some(MeetingId::new(2)));
    }

    #[test]
    fn falls_back_to_earliest_when_all_full() {
        let meetings = vec![
            meeting(7, "2025-05-01", (5, 5), (8, 8)),
            meeting(4, "2025-03-01", (5, 5), (8, 8)),
        ];
        assert_eq!(select_default(&meetings), Some(MeetingId::new(4)));
    }

    #[test]
    fn one_full_lane_does_not_disqualify() {
        let meetings = vec![
            meeting(1, "2025-03-01", (5, 5), (3, 8)),
            meeting(2, "2025-03-15", (0, 5), (0, 8)),
        ];
        assert_eq!(select_default(&meetings), Some(MeetingId::new(1)));
    }

    #[test]
    fn empty_list_has_no_default() {
        assert_eq!(select_default(&[]), None);
    }

    #[test]
    fn same_date_is_ordered_by_id() {
        let meetings = vec![
            meeting(9, "2025-03-01", (0, 5), (0, 8)),
            meeting(5, "2025-03-01", (0, 5), (0, 8)),
        ];
        assert_eq!(select_default(&meetings), Some(MeetingId::new(5)));
    }
}
