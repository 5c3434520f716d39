//! HTTP surface for the task service.
//!
//! ## Endpoints
//!
//! - `GET /api/tasks` — list the owner's tasks in store order
//! - `POST /api/tasks` — create a task (201)
//! - `PUT /api/tasks/{id}` — full-record replace
//! - `DELETE /api/tasks/{id}` — delete (204)
//! - `POST /api/tasks/{id}/instructions` — generate instructions via the
//!   text-generation collaborator, then full-update the task
//! - `GET /api/views/{view}` — composed `today` / `week` / `month` view
//!
//! The owner identity is the `userId` query parameter: an opaque string
//! issued by the identity collaborator, never parsed or validated here.
//! Failures serialize as `{"error": "..."}`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::classify::label_color_bucket;
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};
use crate::textgen::InstructionGenerator;
use crate::{TaskError, dates, views};

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The task store, constructed once at startup and passed down.
    store: Arc<dyn TaskStore>,
    /// Text-generation collaborator, when configured.
    textgen: Option<Arc<InstructionGenerator>>,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>, textgen: Option<Arc<InstructionGenerator>>) -> Self {
        Self { store, textgen }
    }
}

/// Task API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", axum::routing::put(update_task).delete(delete_task))
        .route("/api/tasks/{id}/instructions", post(generate_instructions))
        .route("/api/views/{view}", get(view_tasks))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// ApiServer
// ---------------------------------------------------------------------------

/// HTTP server handle for the task API.
pub struct ApiServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ApiServer {
    /// Start the task API server.
    ///
    /// Binds to `{host}:{port}` (use port `0` for auto-assign) and begins
    /// serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(state: AppState, host: &str, port: u16) -> crate::Result<Self> {
        let app = router(state);

        let bind_addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| TaskError::Transient(format!("bind failed on {bind_addr}: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| TaskError::Transient(format!("failed to get local addr: {e}")))?;

        info!("task API listening on http://{addr}/api");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("task API server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Request / response plumbing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct IdentityQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

impl IdentityQuery {
    /// The opaque owner identity, or `Unauthorized` when absent.
    fn require_owner(&self) -> Result<&str, ApiError> {
        match self.user_id.as_deref().map(str::trim) {
            Some(owner) if !owner.is_empty() => Ok(owner),
            _ => Err(TaskError::Unauthorized("missing userId".to_owned()).into()),
        }
    }
}

/// A task as served: the record plus the display color bucket derived
/// from its label on every read (colors are never stored).
#[derive(Debug, Serialize)]
struct TaskBody {
    #[serde(flatten)]
    task: Task,
    label_bucket: &'static str,
}

fn task_body(task: Task) -> TaskBody {
    let label_bucket = label_color_bucket(task.label.as_deref());
    TaskBody { task, label_bucket }
}

fn task_bodies(tasks: Vec<Task>) -> Vec<TaskBody> {
    tasks.into_iter().map(task_body).collect()
}

/// Error wrapper mapping the crate taxonomy onto HTTP statuses.
struct ApiError(TaskError);

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TaskError::Validation(_) => StatusCode::BAD_REQUEST,
            TaskError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TaskError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskError::TextGen(_) => StatusCode::BAD_GATEWAY,
            TaskError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /api/tasks` — the owner's tasks, due date then start time.
async fn list_tasks(
    State(state): State<AppState>,
    Query(identity): Query<IdentityQuery>,
) -> Result<Json<Vec<TaskBody>>, ApiError> {
    let owner = identity.require_owner()?;
    let tasks = state.store.list(owner).await?;
    Ok(Json(task_bodies(tasks)))
}

/// `POST /api/tasks` — create a task.
async fn create_task(
    State(state): State<AppState>,
    Query(identity): Query<IdentityQuery>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<TaskBody>), ApiError> {
    let owner = identity.require_owner()?;
    let task = state.store.create(owner, draft).await?;
    Ok((StatusCode::CREATED, Json(task_body(task))))
}

/// `PUT /api/tasks/{id}` — full-record replacement.
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(identity): Query<IdentityQuery>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<TaskBody>, ApiError> {
    let owner = identity.require_owner()?;
    let task = state.store.update(owner, &id, draft).await?;
    Ok(Json(task_body(task)))
}

/// `DELETE /api/tasks/{id}` — delete, no content on success.
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(identity): Query<IdentityQuery>,
) -> Result<StatusCode, ApiError> {
    let owner = identity.require_owner()?;
    state.store.delete(owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/tasks/{id}/instructions` — generate instructions from the
/// task's title and description, then apply them via a full update.
async fn generate_instructions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(identity): Query<IdentityQuery>,
) -> Result<Json<TaskBody>, ApiError> {
    let owner = identity.require_owner()?;
    let generator = state
        .textgen
        .as_ref()
        .ok_or_else(|| TaskError::TextGen("text generation is not configured".to_owned()))?;

    let task = state
        .store
        .list(owner)
        .await?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.clone()))?;

    let instructions = generator
        .generate(&task.title, task.description.as_deref())
        .await?;

    let mut draft = task.to_draft();
    draft.instructions = Some(instructions);
    let updated = state.store.update(owner, &id, draft).await?;
    Ok(Json(task_body(updated)))
}

/// `GET /api/views/{view}` — composed projection for `today`, `week`, or
/// `month`, relative to the current local date.
async fn view_tasks(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(identity): Query<IdentityQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let owner = identity.require_owner()?;
    let tasks = state.store.list(owner).await?;
    let today = dates::today();

    let body = match view.as_str() {
        "today" => {
            let split = views::today_view(&tasks, today);
            serde_json::json!({
                "view": "today",
                "doing": task_bodies(split.doing),
                "overdue": task_bodies(split.overdue),
                "completed": task_bodies(split.completed),
            })
        }
        "week" => serde_json::json!({
            "view": "week",
            "tasks": task_bodies(views::week_view(&tasks, today)),
        }),
        "month" => serde_json::json!({
            "view": "month",
            "tasks": task_bodies(views::month_view(&tasks, today)),
        }),
        other => {
            return Err(TaskError::Validation(format!("unknown view: {other}")).into());
        }
    };
    Ok(Json(body))
}
