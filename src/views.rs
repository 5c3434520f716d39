//! View composition: pure projections of a task collection into the
//! day/week/month displays. No persistence and no clock access; callers
//! supply the reference date.

use chrono::NaiveDate;
use serde::Serialize;

use crate::classify::{compare_tasks, is_overdue};
use crate::dates::{month_bounds, week_bounds};
use crate::task::{Task, TaskStatus};

/// Today's tasks split by status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodayView {
    /// Due today, in progress, not yet overdue.
    pub doing: Vec<Task>,
    /// Due today, in progress, already overdue.
    pub overdue: Vec<Task>,
    /// Due today and completed.
    pub completed: Vec<Task>,
}

/// Tasks due today, partitioned into doing / overdue / completed.
///
/// Tasks without a due date are excluded, as in every date-bucketed view.
#[must_use]
pub fn today_view(tasks: &[Task], today: NaiveDate) -> TodayView {
    let mut view = TodayView::default();
    for task in tasks {
        if task.due_date != Some(today) {
            continue;
        }
        match task.status {
            TaskStatus::Completed => view.completed.push(task.clone()),
            TaskStatus::Doing if is_overdue(task, today) => view.overdue.push(task.clone()),
            TaskStatus::Doing => view.doing.push(task.clone()),
        }
    }
    view
}

/// Tasks due in the Monday–Sunday week containing `reference`, sorted by
/// due date then start time.
#[must_use]
pub fn week_view(tasks: &[Task], reference: NaiveDate) -> Vec<Task> {
    let (start, end) = week_bounds(reference);
    range_view(tasks, start, end)
}

/// Tasks due in the calendar month containing `reference`, sorted by due
/// date then start time.
#[must_use]
pub fn month_view(tasks: &[Task], reference: NaiveDate) -> Vec<Task> {
    let (start, end) = month_bounds(reference);
    range_view(tasks, start, end)
}

fn range_view(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|t| matches!(t.due_date, Some(due) if due >= start && due <= end))
        .cloned()
        .collect();
    selected.sort_by(compare_tasks);
    selected
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
