//! Session-side task collection controller.
//!
//! Owns the in-memory task collection for one user session: it loads on
//! identity change, funnels every mutation through the store, and then
//! unconditionally re-lists to resynchronize. There is no optimistic
//! local patching: the collection only ever reflects a successful list.

use std::sync::Arc;

use tracing::warn;

use crate::store::TaskStore;
use crate::task::{Task, TaskDraft, TaskStatus};
use crate::TaskError;

/// Load state of the controller's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// No identity yet, or a list fetch is in flight.
    Loading,
    /// The collection reflects the last successful list.
    Ready,
    /// The last list failed; the previous collection is retained.
    Error,
}

/// Result of a mutating action, with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Task collection controller for a single user session.
pub struct TaskController {
    store: Arc<dyn TaskStore>,
    owner: Option<String>,
    tasks: Vec<Task>,
    phase: LoadPhase,
    last_error: Option<String>,
}

impl TaskController {
    /// Controller with no identity yet; stays in `Loading` until one is
    /// set.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            owner: None,
            tasks: Vec::new(),
            phase: LoadPhase::Loading,
            last_error: None,
        }
    }

    /// The last successfully loaded collection.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Set (or clear) the owner identity and reload the collection.
    pub async fn set_owner(&mut self, owner: Option<String>) {
        self.owner = owner;
        self.reload().await;
    }

    /// Re-list the collection from the store.
    ///
    /// A result is discarded if the identity changed while the fetch was
    /// in flight, so an out-of-order completion never clobbers newer
    /// state. A failed list keeps the previous collection.
    pub async fn reload(&mut self) {
        let Some(owner) = self.owner.clone() else {
            self.phase = LoadPhase::Loading;
            return;
        };

        self.phase = LoadPhase::Loading;
        match self.store.list(&owner).await {
            Ok(tasks) => {
                if self.owner.as_deref() == Some(owner.as_str()) {
                    self.tasks = tasks;
                    self.phase = LoadPhase::Ready;
                    self.last_error = None;
                }
            }
            Err(e) => {
                warn!(error = %e, "task list failed");
                self.phase = LoadPhase::Error;
                self.last_error = Some(failure_message("load tasks", &e));
            }
        }
    }

    /// Create a task, then resynchronize.
    pub async fn add(&mut self, draft: TaskDraft) -> ActionOutcome {
        let Some(owner) = self.owner.clone() else {
            return ActionOutcome::failed("No active user.");
        };
        match self.store.create(&owner, draft).await {
            Ok(_) => {
                self.reload().await;
                ActionOutcome::ok("Task added.")
            }
            Err(e) => ActionOutcome::failed(failure_message("add task", &e)),
        }
    }

    /// Fully replace a task, then resynchronize.
    pub async fn update(&mut self, id: &str, draft: TaskDraft) -> ActionOutcome {
        let Some(owner) = self.owner.clone() else {
            return ActionOutcome::failed("No active user.");
        };
        match self.store.update(&owner, id, draft).await {
            Ok(_) => {
                self.reload().await;
                ActionOutcome::ok("Task updated.")
            }
            Err(e) => ActionOutcome::failed(failure_message("update task", &e)),
        }
    }

    /// Delete a task, then resynchronize.
    pub async fn delete(&mut self, id: &str) -> ActionOutcome {
        let Some(owner) = self.owner.clone() else {
            return ActionOutcome::failed("No active user.");
        };
        match self.store.delete(&owner, id).await {
            Ok(()) => {
                self.reload().await;
                ActionOutcome::ok("Task deleted.")
            }
            Err(e) => ActionOutcome::failed(failure_message("delete task", &e)),
        }
    }

    /// Status-change sugar: a full update with only `status` replaced.
    ///
    /// Resolves the task in the local collection; an unknown id fails
    /// without a store round trip.
    pub async fn change_status(&mut self, id: &str, status: TaskStatus) -> ActionOutcome {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return ActionOutcome::failed("No matching task to update.");
        };
        let mut draft = task.to_draft();
        draft.status = Some(status);
        self.update(id, draft).await
    }
}

/// Validation and not-found errors surface verbatim; transient failures
/// get a generic retry-suggesting notice.
fn failure_message(action: &str, err: &TaskError) -> String {
    match err {
        TaskError::Validation(_) | TaskError::NotFound(_) | TaskError::Unauthorized(_) => {
            format!("Failed to {action}: {err}")
        }
        _ => format!("Failed to {action}. Please try again."),
    }
}
