//! Pure task classification: overdue detection, label color bucketing,
//! and the display sort order.
//!
//! The label hash must stay stable across runs and platforms: colors are
//! never persisted, and consistent grouping relies on recomputing the
//! same bucket for the same label every time.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::task::{Task, TaskStatus};

/// Fixed ordered palette of label color buckets.
pub const LABEL_PALETTE: [&str; 8] = [
    "purple", "indigo", "pink", "teal", "orange", "lime", "cyan", "fuchsia",
];

/// Bucket for tasks with no label.
pub const DEFAULT_LABEL_BUCKET: &str = "gray";

/// Whether a task is overdue as of `today`.
///
/// Only `doing` tasks with a due date strictly before today's calendar
/// date are overdue. Completed and undated tasks never are.
#[must_use]
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    match task.due_date {
        Some(due) if task.status == TaskStatus::Doing => due < today,
        _ => false,
    }
}

/// Deterministic color bucket for a task label.
///
/// Accumulates `hash = code + ((hash << 5) - hash)` over the label's
/// UTF-16 code units, with the shift truncating to 32-bit signed range
/// while the surrounding sum stays exact, then indexes the palette by
/// `|hash| % 8`. Absent or empty labels map to [`DEFAULT_LABEL_BUCKET`].
#[must_use]
pub fn label_color_bucket(label: Option<&str>) -> &'static str {
    let label = match label {
        Some(l) if !l.is_empty() => l,
        _ => return DEFAULT_LABEL_BUCKET,
    };

    let mut hash: i64 = 0;
    for unit in label.encode_utf16() {
        let shifted = (hash as i32).wrapping_shl(5);
        hash = i64::from(unit) + i64::from(shifted) - hash;
    }

    let index = (hash.unsigned_abs() % LABEL_PALETTE.len() as u64) as usize;
    LABEL_PALETTE[index]
}

/// Display ordering: due date ascending with undated tasks last, then
/// start time ascending when both sides have one.
#[must_use]
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    let by_date = match (a.due_date, b.due_date) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    if by_date != Ordering::Equal {
        return by_date;
    }
    match (&a.start_time, &b.start_time) {
        (Some(sa), Some(sb)) => sa.cmp(sb),
        // No reordering when either side lacks a start time.
        _ => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
