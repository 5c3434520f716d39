//! Controller behavior tests: load on identity change, refetch after
//! every mutation, status-change sugar, and failure handling that keeps
//! the last-known-good collection.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use taskdeck::{
    ApiServer, AppState, HttpTaskStore, LoadPhase, Result, SqliteTaskStore, Task, TaskController,
    TaskDraft, TaskError, TaskStatus, TaskStore,
};

fn draft(title: &str, due: Option<&str>) -> TaskDraft {
    TaskDraft {
        title: title.to_owned(),
        due_date: due.map(|d| d.parse().expect("valid date")),
        ..TaskDraft::default()
    }
}

fn sqlite_store(dir: &tempfile::TempDir) -> Arc<SqliteTaskStore> {
    Arc::new(SqliteTaskStore::open(&dir.path().join("tasks.db")).expect("open store"))
}

/// Delegating store that counts calls and fails on demand.
struct FlakyStore {
    inner: Arc<SqliteTaskStore>,
    fail: AtomicBool,
    list_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl FlakyStore {
    fn new(inner: Arc<SqliteTaskStore>) -> Self {
        Self {
            inner,
            fail: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
        }
    }

    fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TaskError::Transient("injected outage".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<Task>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.list(owner_id).await
    }

    async fn create(&self, owner_id: &str, draft: TaskDraft) -> Result<Task> {
        self.check()?;
        self.inner.create(owner_id, draft).await
    }

    async fn update(&self, owner_id: &str, id: &str, draft: TaskDraft) -> Result<Task> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.update(owner_id, id, draft).await
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        self.check()?;
        self.inner.delete(owner_id, id).await
    }
}

#[tokio::test]
async fn loads_when_identity_becomes_available() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let store = sqlite_store(&dir);
    store
        .create("alice", draft("existing", Some("2025-06-10")))
        .await
        .expect("seed");

    let mut controller = TaskController::new(store);
    assert_eq!(controller.phase(), LoadPhase::Loading);
    assert!(controller.tasks().is_empty());

    controller.set_owner(Some("alice".to_owned())).await;
    assert_eq!(controller.phase(), LoadPhase::Ready);
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks()[0].title, "existing");

    // Clearing the identity goes back to loading without corrupting
    // anything.
    controller.set_owner(None).await;
    assert_eq!(controller.phase(), LoadPhase::Loading);
}

#[tokio::test]
async fn mutations_refetch_the_collection() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let store = sqlite_store(&dir);
    let mut controller = TaskController::new(store);
    controller.set_owner(Some("alice".to_owned())).await;

    let outcome = controller.add(draft("new task", Some("2025-06-10"))).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Task added.");
    assert_eq!(controller.tasks().len(), 1);

    let id = controller.tasks()[0].id.clone();
    let outcome = controller.update(&id, draft("renamed", Some("2025-06-11"))).await;
    assert!(outcome.success);
    assert_eq!(controller.tasks()[0].title, "renamed");

    let outcome = controller.delete(&id).await;
    assert!(outcome.success);
    assert!(controller.tasks().is_empty());
}

#[tokio::test]
async fn change_status_replaces_only_status() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let store = sqlite_store(&dir);
    let mut controller = TaskController::new(store);
    controller.set_owner(Some("alice".to_owned())).await;

    let mut d = draft("finish report", Some("2025-06-10"));
    d.start_time = Some("09:00".to_owned());
    d.label = Some("work".to_owned());
    controller.add(d).await;

    let id = controller.tasks()[0].id.clone();
    let outcome = controller.change_status(&id, TaskStatus::Completed).await;
    assert!(outcome.success);

    let task = &controller.tasks()[0];
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.title, "finish report");
    assert_eq!(task.start_time.as_deref(), Some("09:00"));
    assert_eq!(task.label.as_deref(), Some("work"));
}

#[tokio::test]
async fn change_status_for_unknown_id_skips_the_store() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let flaky = Arc::new(FlakyStore::new(sqlite_store(&dir)));
    let mut controller = TaskController::new(Arc::clone(&flaky) as Arc<dyn TaskStore>);
    controller.set_owner(Some("alice".to_owned())).await;

    let outcome = controller
        .change_status("task-unknown", TaskStatus::Completed)
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "No matching task to update.");
    assert_eq!(flaky.update_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_list_retains_last_good_collection() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let flaky = Arc::new(FlakyStore::new(sqlite_store(&dir)));
    flaky
        .inner
        .create("alice", draft("keep me", Some("2025-06-10")))
        .await
        .expect("seed");

    let mut controller = TaskController::new(Arc::clone(&flaky) as Arc<dyn TaskStore>);
    controller.set_owner(Some("alice".to_owned())).await;
    assert_eq!(controller.tasks().len(), 1);

    flaky.set_failing(true);
    controller.reload().await;
    assert_eq!(controller.phase(), LoadPhase::Error);
    // Transient failures surface a generic retry notice, not the raw error.
    assert!(controller.last_error().expect("error").contains("try again"));
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks()[0].title, "keep me");
}

#[tokio::test]
async fn failed_mutation_keeps_state_and_reports_failure() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let flaky = Arc::new(FlakyStore::new(sqlite_store(&dir)));
    let mut controller = TaskController::new(Arc::clone(&flaky) as Arc<dyn TaskStore>);
    controller.set_owner(Some("alice".to_owned())).await;
    controller.add(draft("stable", Some("2025-06-10"))).await;

    flaky.set_failing(true);
    let outcome = controller.add(draft("wont make it", None)).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("try again"));
    assert_eq!(controller.phase(), LoadPhase::Ready);
    assert_eq!(controller.tasks().len(), 1);
}

#[tokio::test]
async fn validation_failures_surface_verbatim() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let mut controller = TaskController::new(sqlite_store(&dir));
    controller.set_owner(Some("alice".to_owned())).await;

    let outcome = controller.add(draft("", None)).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("title is required"));
}

#[tokio::test]
async fn actions_without_identity_fail_cleanly() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let mut controller = TaskController::new(sqlite_store(&dir));

    let outcome = controller.add(draft("orphan", None)).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "No active user.");
}

#[tokio::test]
async fn controller_runs_unchanged_over_the_http_store() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let state = AppState::new(sqlite_store(&dir), None);
    let server = ApiServer::start(state, "127.0.0.1", 0).await.expect("start server");

    let remote = Arc::new(HttpTaskStore::new(format!("http://{}", server.addr())));
    let mut controller = TaskController::new(remote);
    controller.set_owner(Some("alice".to_owned())).await;

    let outcome = controller.add(draft("remote task", Some("2025-06-10"))).await;
    assert!(outcome.success);
    assert_eq!(controller.tasks().len(), 1);

    let id = controller.tasks()[0].id.clone();
    let outcome = controller.change_status(&id, TaskStatus::Completed).await;
    assert!(outcome.success);
    assert_eq!(controller.tasks()[0].status, TaskStatus::Completed);

    let outcome = controller.delete(&id).await;
    assert!(outcome.success);
    assert!(controller.tasks().is_empty());
}
