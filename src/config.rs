//! Configuration types for the task service.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::textgen::SecretRef;
use crate::{Result, TaskError};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub http: HttpConfig,
    /// Task database settings.
    pub database: DatabaseConfig,
    /// Text-generation collaborator settings.
    pub textgen: TextGenConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind host (use port `0` for auto-assign in tests).
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Task database configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file path. `None` means the platform data directory.
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// The effective database file path.
    ///
    /// Resolution order: configured `path`, then
    /// `{data_local_dir}/taskdeck/tasks.db`, then `./tasks.db`.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let mut dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push("taskdeck");
        dir.push("tasks.db");
        dir
    }
}

/// Text-generation collaborator configuration.
///
/// Disabled by default; the instruction-generation endpoint reports a
/// generation error until a provider is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextGenConfig {
    pub enabled: bool,
    /// Provider base URL.
    pub api_url: String,
    /// Model identifier appended to the `generateContent` path.
    pub api_model: String,
    /// API key reference.
    pub api_key: SecretRef,
}

impl Default for TextGenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: "https://generativelanguage.googleapis.com".to_owned(),
            api_model: "gemini-2.0-flash".to_owned(),
            api_key: SecretRef::None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a toml file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TaskError::Config(format!("failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&raw)
            .map_err(|e| TaskError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
