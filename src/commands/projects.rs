//! Project Commands
//!
//! New / save / open / import of project documents.

use std::path::PathBuf;

use super::with_designer;
use crate::models::response::CommandResponse;
use crate::models::workspace::{SavedFile, WorkspaceSnapshot};
use crate::state::AppState;

/// Reset to an empty project and forget the stored workspace
pub async fn new_project(state: &AppState) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.new_project().await) }).await
}

/// Save the project as `<projectName>.json` in the download directory
pub async fn save_project(state: &AppState) -> CommandResponse<SavedFile> {
    with_designer(state, |d| async move { d.save_project().await }).await
}

/// Load a project file from disk
pub async fn open_project(state: &AppState, path: PathBuf) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { d.open_project(&path).await }).await
}

/// Load a project from document text
pub async fn import_project(state: &AppState, content: String) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { d.import_project(&content).await }).await
}
