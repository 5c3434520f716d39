//! Core task domain types shared by the store, controller, views, and
//! HTTP surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Open and being worked on.
    #[default]
    Doing,
    /// Done. A completed task is never overdue, regardless of its due date.
    Completed,
}

/// A single task owned by one user.
///
/// `id` and `owner_id` are assigned at creation and immutable thereafter;
/// every store operation is scoped by `owner_id`. The owner field is
/// serialized as `user_id` to match the wire format and the `tasks` table
/// column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Opaque store-assigned identifier (`task-<uuid>`).
    pub id: String,
    /// Opaque identity of the owning user.
    #[serde(rename = "user_id")]
    pub owner_id: String,
    /// Non-empty task title.
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Estimated effort in hours; non-negative when present.
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Calendar due date. Tasks without one never appear in the
    /// day/week/month views but still exist and list.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Local `HH:MM` start time, display ordering only.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Local `HH:MM` end time, display text only; never validated
    /// against `start_time`.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Free-text instructions, possibly machine-generated.
    #[serde(default)]
    pub instructions: Option<String>,
    /// Free-text label; hashed to a display color bucket on every read.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

impl Task {
    /// Full-record snapshot of this task's mutable fields, for
    /// replacement-style updates.
    #[must_use]
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            estimated_hours: self.estimated_hours,
            due_date: self.due_date,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            instructions: self.instructions.clone(),
            label: self.label.clone(),
            status: Some(self.status),
        }
    }
}

/// Input fields for creating or fully replacing a task.
///
/// Updates supply every field, including unchanged ones; there is no
/// partial-field patch semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    /// Defaults to [`TaskStatus::Doing`] when unspecified.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    /// Minimal draft with just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validate required-field invariants.
    ///
    /// # Errors
    ///
    /// [`crate::TaskError::Validation`] when the title is empty or the
    /// estimated hours are negative or non-finite.
    pub fn validate(&self) -> crate::Result<()> {
        if self.title.trim().is_empty() {
            return Err(crate::TaskError::Validation(
                "title is required".to_owned(),
            ));
        }
        if let Some(hours) = self.estimated_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(crate::TaskError::Validation(format!(
                    "estimated_hours must be a non-negative number, got {hours}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Generate a store-assigned task id.
pub(crate) fn new_task_id() -> String {
    format!("task-{}", uuid::Uuid::new_v4())
}

/// Current Unix timestamp in seconds.
pub(crate) fn now_epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
