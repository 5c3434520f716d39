//! Instruction generation via an external text-generation API.
//!
//! The collaborator is an opaque text producer: given a task's title and
//! description it returns free-text step-by-step instructions, or fails.
//! The wire shape is the `generateContent` JSON contract
//! (`contents[].parts[].text` in, `candidates[0].content.parts[0].text`
//! out) with the API key passed as a query parameter.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::TextGenConfig;
use crate::{Result, TaskError};

/// Secret reference used for the text-generation API key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretRef {
    /// No API key.
    #[default]
    None,
    /// Inline literal key (discouraged; use env/command when possible).
    Literal { value: String },
    /// Resolve the key from an environment variable.
    Env { var: String },
    /// Resolve the key by running a local command.
    Command { cmd: String },
}

impl SecretRef {
    /// Resolve the referenced secret.
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Literal { value } => Ok(Some(value.clone())),
            Self::Env { var } => {
                let value = std::env::var(var).map_err(|_| {
                    TaskError::Config(format!("text-generation key env var is missing: {var}"))
                })?;
                if value.trim().is_empty() {
                    return Err(TaskError::Config(format!(
                        "text-generation key env var is empty: {var}"
                    )));
                }
                Ok(Some(value))
            }
            Self::Command { cmd } => {
                if cmd.trim().is_empty() {
                    return Err(TaskError::Config(
                        "text-generation key command is empty".to_owned(),
                    ));
                }
                let output = std::process::Command::new("/bin/sh")
                    .arg("-lc")
                    .arg(cmd)
                    .output()
                    .map_err(|e| {
                        TaskError::Config(format!(
                            "failed to run text-generation key command: {e}"
                        ))
                    })?;

                if !output.status.success() {
                    return Err(TaskError::Config(format!(
                        "text-generation key command failed with status {}",
                        output
                            .status
                            .code()
                            .map_or_else(|| "unknown".to_owned(), |c| c.to_string())
                    )));
                }

                let value = String::from_utf8_lossy(&output.stdout).trim().to_owned();
                if value.is_empty() {
                    return Err(TaskError::Config(
                        "text-generation key command returned empty output".to_owned(),
                    ));
                }
                Ok(Some(value))
            }
        }
    }
}

/// Client for the text-generation collaborator.
pub struct InstructionGenerator {
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl InstructionGenerator {
    /// Build a generator from configuration, resolving the key reference.
    pub fn new(config: &TextGenConfig) -> Result<Self> {
        let api_key = config.api_key.resolve()?.unwrap_or_default();
        Ok(Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            model: config.api_model.clone(),
            api_key,
        })
    }

    /// Build a generator from configuration when enabled.
    pub fn from_config(config: &TextGenConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(config).map(Some)
    }

    /// Generate step-by-step instructions for a task.
    ///
    /// # Errors
    ///
    /// [`TaskError::TextGen`] on connection failure, a non-success
    /// status, or a response with no candidates.
    pub async fn generate(&self, title: &str, description: Option<&str>) -> Result<String> {
        let prompt = build_prompt(title, description);
        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        debug!(model = %self.model, "requesting instruction generation");

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_url, self.model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TaskError::TextGen(format!("connection error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            error!(status = %status, "text-generation request returned error");
            return Err(TaskError::TextGen(format!(
                "provider returned status {status}"
            )));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TaskError::TextGen(format!("invalid response body: {e}")))?;

        value
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| TaskError::TextGen("response contained no candidates".to_owned()))
    }
}

/// The generation prompt for a task.
pub(crate) fn build_prompt(title: &str, description: Option<&str>) -> String {
    format!(
        "Write clear, concise step-by-step instructions for the following task.\n\
         Title: {title}\n\
         Description: {}",
        description.unwrap_or("No description.")
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
