//! Workspace Commands
//!
//! Record editing and drag-and-drop reordering. Every command returns the
//! full workspace snapshot after the change; unknown ids are no-ops.

use brb_designer_core::{Bounds, DragEvent, RecordField, RowColumn};

use super::with_designer;
use crate::models::response::CommandResponse;
use crate::models::workspace::WorkspaceSnapshot;
use crate::state::AppState;

/// Get the current workspace
pub async fn get_workspace(state: &AppState) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.snapshot().await) }).await
}

pub async fn set_project_name(state: &AppState, name: String) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.set_project_name(name).await) }).await
}

pub async fn add_record(state: &AppState) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.add_record().await) }).await
}

pub async fn remove_record(state: &AppState, id: String) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.remove_record(&id).await) }).await
}

pub async fn update_field(
    state: &AppState,
    id: String,
    field: RecordField,
    value: String,
) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.update_field(&id, field, value).await) }).await
}

pub async fn add_quantity_row(state: &AppState, id: String) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.add_quantity_row(&id).await) }).await
}

pub async fn remove_quantity_row(
    state: &AppState,
    id: String,
    index: usize,
) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.remove_quantity_row(&id, index).await) }).await
}

pub async fn update_quantity_row(
    state: &AppState,
    id: String,
    index: usize,
    column: RowColumn,
    value: String,
) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move {
        Ok(d.update_quantity_row(&id, index, column, value).await)
    })
    .await
}

/// Move a record directly, without a drag gesture
pub async fn reorder_records(state: &AppState, from: usize, to: usize) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.reorder(from, to).await) }).await
}

/// Recompute the total quantity from the records
pub async fn compute_total(state: &AppState) -> CommandResponse<u64> {
    with_designer(state, |d| async move { Ok(d.compute_total().await) }).await
}

// ============================================================================
// Drag and drop
// ============================================================================

async fn drag(state: &AppState, event: DragEvent) -> CommandResponse<WorkspaceSnapshot> {
    with_designer(state, |d| async move { Ok(d.drag(event).await) }).await
}

pub async fn drag_start(state: &AppState, index: usize) -> CommandResponse<WorkspaceSnapshot> {
    drag(state, DragEvent::Start { index }).await
}

pub async fn drag_over(
    state: &AppState,
    index: usize,
    x: f64,
    bounds: Bounds,
) -> CommandResponse<WorkspaceSnapshot> {
    drag(state, DragEvent::Over { index, x, bounds }).await
}

pub async fn drag_leave(state: &AppState) -> CommandResponse<WorkspaceSnapshot> {
    drag(state, DragEvent::LeaveContainer).await
}

pub async fn drop_on_record(
    state: &AppState,
    index: usize,
    x: f64,
    bounds: Bounds,
) -> CommandResponse<WorkspaceSnapshot> {
    drag(state, DragEvent::DropOnRecord { index, x, bounds }).await
}

pub async fn drop_at_end(state: &AppState) -> CommandResponse<WorkspaceSnapshot> {
    drag(state, DragEvent::DropAtEnd).await
}

pub async fn drag_cancel(state: &AppState) -> CommandResponse<WorkspaceSnapshot> {
    drag(state, DragEvent::Cancel).await
}
