//! HTTP client implementation of the task store contract.
//!
//! [`HttpTaskStore`] speaks the task API's wire format (query-string
//! owner identity, JSON bodies, `{"error": ...}` failure payloads) and
//! maps HTTP statuses back into the crate error taxonomy, so the
//! controller runs unchanged against a remote service.

use async_trait::async_trait;

use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};
use crate::{Result, TaskError};

/// Task store backed by a remote task API.
pub struct HttpTaskStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTaskStore {
    /// Client for the service at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Ask the service to generate instructions for a task, returning the
    /// updated record.
    pub async fn generate_instructions(&self, owner_id: &str, id: &str) -> Result<Task> {
        let url = format!(
            "{}/api/tasks/{}/instructions?userId={}",
            self.base_url,
            urlencoding::encode(id),
            urlencoding::encode(owner_id)
        );
        let response = self.client.post(&url).send().await.map_err(connection)?;
        decode(response).await
    }

    fn collection_url(&self, owner_id: &str) -> String {
        format!(
            "{}/api/tasks?userId={}",
            self.base_url,
            urlencoding::encode(owner_id)
        )
    }

    fn task_url(&self, owner_id: &str, id: &str) -> String {
        format!(
            "{}/api/tasks/{}?userId={}",
            self.base_url,
            urlencoding::encode(id),
            urlencoding::encode(owner_id)
        )
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<Task>> {
        let response = self
            .client
            .get(self.collection_url(owner_id))
            .send()
            .await
            .map_err(connection)?;
        decode(response).await
    }

    async fn create(&self, owner_id: &str, draft: TaskDraft) -> Result<Task> {
        let response = self
            .client
            .post(self.collection_url(owner_id))
            .json(&draft)
            .send()
            .await
            .map_err(connection)?;
        decode(response).await
    }

    async fn update(&self, owner_id: &str, id: &str, draft: TaskDraft) -> Result<Task> {
        let response = self
            .client
            .put(self.task_url(owner_id, id))
            .json(&draft)
            .send()
            .await
            .map_err(connection)?;
        decode(response).await
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.task_url(owner_id, id))
            .send()
            .await
            .map_err(connection)?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(decode_error(response).await)
    }
}

fn connection(e: reqwest::Error) -> TaskError {
    TaskError::Transient(format!("connection error: {e}"))
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(decode_error(response).await);
    }
    response
        .json()
        .await
        .map_err(|e| TaskError::Transient(format!("invalid response body: {e}")))
}

/// Map a failure response back into the error taxonomy.
async fn decode_error(response: reqwest::Response) -> TaskError {
    let status = response.status();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
        .unwrap_or_else(|| format!("HTTP status {status}"));

    match status {
        reqwest::StatusCode::BAD_REQUEST => TaskError::Validation(message),
        reqwest::StatusCode::UNAUTHORIZED => TaskError::Unauthorized(message),
        reqwest::StatusCode::NOT_FOUND => TaskError::NotFound(message),
        reqwest::StatusCode::BAD_GATEWAY => TaskError::TextGen(message),
        _ => TaskError::Transient(message),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
