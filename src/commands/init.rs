//! Initialization Commands
//!
//! Commands for application initialization and setup.
//! On startup, initializes all backend services and restores the workspace
//! left by the previous session.

use serde::{Deserialize, Serialize};

use crate::models::response::CommandResponse;
use crate::state::AppState;

/// Result of application initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResult {
    /// Success message
    pub message: String,
    /// Project name restored from the previous session
    pub project_name: String,
    /// Number of records restored
    pub record_count: usize,
}

/// Initialize the application on startup
pub async fn init_app(state: &AppState) -> CommandResponse<InitResult> {
    if let Err(e) = state.initialize().await {
        return CommandResponse::from_error(e);
    }

    match state.designer().await {
        Ok(designer) => {
            let snapshot = designer.snapshot().await;
            let message = if snapshot.project_name.is_empty() {
                "Application initialized successfully".to_string()
            } else {
                format!(
                    "Application initialized successfully. Restored project '{}'.",
                    snapshot.project_name
                )
            };
            CommandResponse::ok(InitResult {
                message,
                project_name: snapshot.project_name,
                record_count: snapshot.records.len(),
            })
        }
        Err(e) => CommandResponse::from_error(e),
    }
}

/// Get the application version
pub fn get_version() -> CommandResponse<String> {
    CommandResponse::ok(env!("CARGO_PKG_VERSION").to_string())
}
