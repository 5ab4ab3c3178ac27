//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use std::time::Duration;

use brb_designer_core::CoreError;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite errors (auto-converted from rusqlite::Error)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Project file is not a structured document
    #[error("Project file format error: {0}")]
    MalformedDocument(String),

    /// No response within the wait ceiling
    #[error("Request timed out after {}s, check the network connection or retry later", .0.as_secs_f64())]
    RequestTimeout(Duration),

    /// Transport-level failure reaching the service
    #[error("Unable to reach the server, check the network connection and server status: {0}")]
    NetworkUnavailable(String),

    /// The service answered with a non-success status
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Remote delete of a generated file failed; the local entry is gone
    #[error("Remote cleanup failed: {0}")]
    RemoteCleanup(String),

    /// The same action is already running
    #[error("Already in progress: {0}")]
    Busy(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a service error
    pub fn service(status: u16, msg: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: msg.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkUnavailable(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable category, used by the frontend to pick a
    /// notification style.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Sqlite(_) => "storage",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Validation(_) => "validation",
            Self::MalformedDocument(_) => "malformed_document",
            Self::RequestTimeout(_) => "request_timeout",
            Self::NetworkUnavailable(_) => "network_unavailable",
            Self::Service { .. } => "service",
            Self::RemoteCleanup(_) => "remote_cleanup",
            Self::Busy(_) => "busy",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::MalformedDocument(msg) => Self::MalformedDocument(msg),
            CoreError::Serialization(e) => Self::Serialization(e),
            CoreError::NotFound(msg) => Self::NotFound(msg),
        }
    }
}

/// Convert AppError to a string suitable for command responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
