//! Error types for the task service.

/// Top-level error type for the task-management service.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// A required field is missing or malformed (e.g. empty title).
    #[error("validation error: {0}")]
    Validation(String),

    /// No task matches the given id for the acting owner.
    ///
    /// Cross-owner access reports this variant too; existence is never
    /// leaked across owners.
    #[error("task not found: {0}")]
    NotFound(String),

    /// No owner identity was supplied with the request.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Network or storage hiccup; the operation may succeed if retried.
    #[error("transient error: {0}")]
    Transient(String),

    /// SQLite storage error.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Text-generation collaborator error.
    #[error("text generation error: {0}")]
    TextGen(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection mutex poisoned by a panicked writer.
    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, TaskError>;
