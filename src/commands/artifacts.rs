//! Artifact Commands
//!
//! Drawing/materials generation and management of the generated files.

use super::with_designer;
use crate::models::artifact::GeneratedArtifact;
use crate::models::response::CommandResponse;
use crate::models::workspace::SavedFile;
use crate::state::AppState;

/// Generate drawings for every record
pub async fn generate_drawings(state: &AppState) -> CommandResponse<Vec<GeneratedArtifact>> {
    with_designer(state, |d| async move { d.generate_drawings().await }).await
}

/// Generate the materials list
pub async fn generate_materials(state: &AppState) -> CommandResponse<GeneratedArtifact> {
    with_designer(state, |d| async move { d.generate_materials().await }).await
}

pub async fn list_artifacts(state: &AppState) -> CommandResponse<Vec<GeneratedArtifact>> {
    with_designer(state, |d| async move { Ok(d.list_artifacts().await) }).await
}

pub async fn download_artifact(state: &AppState, id: String) -> CommandResponse<SavedFile> {
    with_designer(state, |d| async move { d.download_artifact(&id).await }).await
}

/// Download every generated file as one zip archive
pub async fn download_all_artifacts(state: &AppState) -> CommandResponse<SavedFile> {
    with_designer(state, |d| async move { d.download_all_artifacts().await }).await
}

pub async fn delete_artifact(state: &AppState, id: String) -> CommandResponse<GeneratedArtifact> {
    with_designer(state, |d| async move { d.delete_artifact(&id).await }).await
}
