//! BRB Designer - Backend Library
//!
//! This library provides the backend of the BRB design tool.
//! It includes:
//! - Command handlers and the JSON-lines IPC dispatcher
//! - Business logic services (workspace, generation client, artifact ledger)
//! - Storage layer (SQLite key-value store, JSON config)
//! - Data models and utilities
//!
//! The I/O-free data model lives in the `brb-designer-core` crate.

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used items from commands
pub use commands::{
    // Init commands
    init_app, get_version,
    // Health commands
    get_health,
    // Settings commands
    get_settings, update_settings,
    // Workspace commands
    get_workspace, set_project_name, add_record, remove_record, update_field,
    add_quantity_row, remove_quantity_row, update_quantity_row, reorder_records, compute_total,
    // Drag commands
    drag_start, drag_over, drag_leave, drop_on_record, drop_at_end, drag_cancel,
    // Project commands
    new_project, save_project, open_project, import_project,
    // Artifact commands
    generate_drawings, generate_materials, list_artifacts, download_artifact,
    download_all_artifacts, delete_artifact,
    // IPC
    dispatch, dispatch_line,
};
// Re-export models (avoiding settings module conflict)
pub use models::response::*;
pub use models::settings::{AppConfig, SettingsUpdate};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
