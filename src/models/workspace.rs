//! Workspace Models
//!
//! Snapshot of the live workspace handed to the frontend after each command.

use brb_designer_core::{DragState, ParameterRecord};
use serde::{Deserialize, Serialize};

use super::artifact::GeneratedArtifact;

/// Full view of the workspace at one point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub project_name: String,
    pub records: Vec<ParameterRecord>,
    pub total_quantity: u64,
    /// A project name or any quantity has been entered; the frontend asks
    /// for confirmation before replacing such a workspace.
    pub unsaved_content: bool,
    pub drag: DragState,
    /// Where the insertion marker is drawn, if a drag is hovering a target
    pub insertion_marker: Option<usize>,
    pub artifacts: Vec<GeneratedArtifact>,
    pub generating_drawings: bool,
    pub generating_materials: bool,
}

/// Result of a save: where the document went
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFile {
    pub file_name: String,
    pub path: String,
    pub size: u64,
}
