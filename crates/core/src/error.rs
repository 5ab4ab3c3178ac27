//! Core Error Types
//!
//! Defines the foundational error types used across the BRB Designer workspace.
//! These error types are dependency-free (only thiserror + std) to keep the core
//! crate lightweight.
//!
//! The main application crate extends these with additional error variants
//! (e.g., Database, Sqlite, network failures) that require heavier dependencies.

use thiserror::Error;

/// Core error type for the BRB Designer workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A value failed validation before it could be used
    #[error("Validation error: {0}")]
    Validation(String),

    /// A project document is not a structured object
    #[error("Malformed project document: {0}")]
    MalformedDocument(String),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a malformed document error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
