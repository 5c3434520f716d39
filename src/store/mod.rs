//! Task persistence boundary.
//!
//! [`TaskStore`] is the owner-scoped CRUD contract; the service
//! constructs one concrete store at startup and threads it through
//! explicitly rather than reaching for a global handle. Two
//! implementations exist: [`SqliteTaskStore`] against the local
//! relational table, and [`crate::client::HttpTaskStore`] against a
//! remote instance of the HTTP API.

mod schema;
mod sqlite;

pub use sqlite::SqliteTaskStore;

use async_trait::async_trait;

use crate::Result;
use crate::task::{Task, TaskDraft};

/// Owner-scoped task persistence.
///
/// Every operation is scoped by `owner_id`; an id belonging to a
/// different owner is indistinguishable from a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks for `owner_id`, ordered by due date then start time,
    /// absent values last.
    async fn list(&self, owner_id: &str) -> Result<Vec<Task>>;

    /// Insert a new task, defaulting status to `doing`.
    ///
    /// # Errors
    ///
    /// [`crate::TaskError::Validation`] when the draft's title is empty
    /// or its estimated hours are negative.
    async fn create(&self, owner_id: &str, draft: TaskDraft) -> Result<Task>;

    /// Full-record replacement of the task matching `(id, owner_id)`.
    ///
    /// # Errors
    ///
    /// [`crate::TaskError::Validation`] on an invalid draft,
    /// [`crate::TaskError::NotFound`] when no row matches.
    async fn update(&self, owner_id: &str, id: &str, draft: TaskDraft) -> Result<Task>;

    /// Remove the task matching `(id, owner_id)`.
    ///
    /// # Errors
    ///
    /// [`crate::TaskError::NotFound`] when no row matches.
    async fn delete(&self, owner_id: &str, id: &str) -> Result<()>;
}
