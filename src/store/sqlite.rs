//! SQLite-backed task store.
//!
//! Implements [`TaskStore`] against a single SQLite database file.
//! Thread-safe via an internal `Mutex<Connection>`: all writes are
//! serialized, which is the only write coordination the service needs
//! (ordinary row-level transaction semantics, no custom locking).

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{Connection, params};

use super::TaskStore;
use super::schema::{apply_schema, read_schema_version};
use crate::task::{Task, TaskDraft, TaskStatus, new_task_id, now_epoch_secs};
use crate::{Result, TaskError};

const TASK_COLUMNS: &str = "id, user_id, title, description, estimated_hours, due_date, \
     start_time, end_time, instructions, label, status, created_at, updated_at";

/// SQLite-backed task store.
pub struct SqliteTaskStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Open (or create) the task database at `db_path`, creating parent
    /// directories and applying the schema as needed.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        apply_schema(&conn)?;
        Ok(Self {
            path: db_path.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current schema version from the database.
    pub fn schema_version(&self) -> Result<Option<u32>> {
        let conn = self.lock()?;
        Ok(read_schema_version(&conn)?)
    }

    /// Acquire the connection mutex.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| TaskError::Lock(e.to_string()))
    }

    fn fetch(&self, conn: &Connection, owner_id: &str, id: &str) -> Result<Task> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2");
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id, owner_id], row_to_task)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(TaskError::NotFound(id.to_owned())),
        }
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 \
             ORDER BY due_date IS NULL, due_date ASC, start_time IS NULL, start_time ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![owner_id], row_to_task)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    async fn create(&self, owner_id: &str, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;

        let conn = self.lock()?;
        let now = now_epoch_secs();
        let id = new_task_id();
        let status = draft.status.unwrap_or_default();

        conn.execute(
            "INSERT INTO tasks \
             (id, user_id, title, description, estimated_hours, due_date, start_time, \
              end_time, instructions, label, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                id,
                owner_id,
                draft.title,
                draft.description,
                draft.estimated_hours,
                draft.due_date.map(|d| d.to_string()),
                draft.start_time,
                draft.end_time,
                draft.instructions,
                draft.label,
                status_to_str(status),
                now,
                now
            ],
        )?;

        self.fetch(&conn, owner_id, &id)
    }

    async fn update(&self, owner_id: &str, id: &str, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;

        let conn = self.lock()?;
        let now = now_epoch_secs();
        let status = draft.status.unwrap_or_default();

        let rows = conn.execute(
            "UPDATE tasks SET \
             title = ?1, description = ?2, estimated_hours = ?3, due_date = ?4, \
             start_time = ?5, end_time = ?6, instructions = ?7, label = ?8, \
             status = ?9, updated_at = ?10 \
             WHERE id = ?11 AND user_id = ?12",
            params![
                draft.title,
                draft.description,
                draft.estimated_hours,
                draft.due_date.map(|d| d.to_string()),
                draft.start_time,
                draft.end_time,
                draft.instructions,
                draft.label,
                status_to_str(status),
                now,
                id,
                owner_id
            ],
        )?;

        if rows == 0 {
            return Err(TaskError::NotFound(id.to_owned()));
        }

        self.fetch(&conn, owner_id, id)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            params![id, owner_id],
        )?;

        if rows == 0 {
            return Err(TaskError::NotFound(id.to_owned()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row conversion helpers
// ---------------------------------------------------------------------------

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let due_date: Option<String> = row.get(5)?;
    let status_str: String = row.get(10)?;

    Ok(Task {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        estimated_hours: row.get(4)?,
        due_date: due_date.and_then(|d| d.parse().ok()),
        start_time: row.get(6)?,
        end_time: row.get(7)?,
        instructions: row.get(8)?,
        label: row.get(9)?,
        status: str_to_status(&status_str),
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn status_to_str(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Doing => "doing",
        TaskStatus::Completed => "completed",
    }
}

fn str_to_status(s: &str) -> TaskStatus {
    match s {
        "completed" => TaskStatus::Completed,
        _ => TaskStatus::Doing, // safe fallback
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
