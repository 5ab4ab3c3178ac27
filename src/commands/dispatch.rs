//! IPC Dispatcher
//!
//! Routes `{"id": ..., "command": "...", "args": {...}}` requests onto the
//! command functions. Every outcome, including an unknown command or bad
//! arguments, becomes a `CommandResponse`; nothing here panics or aborts.

use std::path::PathBuf;

use brb_designer_core::{Bounds, RecordField, RowColumn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{artifacts, health, init, projects, settings, workspace};
use crate::models::response::CommandResponse;
use crate::models::settings::SettingsUpdate;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// One request line
#[derive(Debug, Clone, Deserialize)]
pub struct IpcRequest {
    /// Echoed back so callers can match responses to requests
    #[serde(default)]
    pub id: Option<Value>,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// One response line
#[derive(Debug, Clone, Serialize)]
pub struct IpcResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub response: CommandResponse<Value>,
}

// ============================================================================
// Argument shapes
// ============================================================================

#[derive(Deserialize)]
struct IdArgs {
    id: String,
}

#[derive(Deserialize)]
struct NameArgs {
    name: String,
}

#[derive(Deserialize)]
struct FieldArgs {
    id: String,
    field: RecordField,
    value: String,
}

#[derive(Deserialize)]
struct RowArgs {
    id: String,
    index: usize,
}

#[derive(Deserialize)]
struct RowCellArgs {
    id: String,
    index: usize,
    column: RowColumn,
    value: String,
}

#[derive(Deserialize)]
struct MoveArgs {
    from: usize,
    to: usize,
}

#[derive(Deserialize)]
struct IndexArgs {
    index: usize,
}

#[derive(Deserialize)]
struct PointerArgs {
    index: usize,
    x: f64,
    bounds: Bounds,
}

#[derive(Deserialize)]
struct PathArgs {
    path: PathBuf,
}

#[derive(Deserialize)]
struct ContentArgs {
    content: String,
}

fn parse_args<T: DeserializeOwned>(command: &str, args: Value) -> AppResult<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| AppError::validation(format!("Invalid arguments for {}: {}", command, e)))
}

fn to_value<T: Serialize>(response: CommandResponse<T>) -> CommandResponse<Value> {
    let CommandResponse {
        success,
        data,
        error,
        error_kind,
    } = response;

    match data.map(serde_json::to_value).transpose() {
        Ok(data) => CommandResponse {
            success,
            data,
            error,
            error_kind,
        },
        Err(e) => CommandResponse::from_error(e.into()),
    }
}

/// Parse arguments and run `$call` with them, or fail with a validation response.
macro_rules! with_args {
    ($command:expr, $args:expr, |$a:ident: $ty:ty| $call:expr) => {
        match parse_args::<$ty>($command, $args) {
            Ok($a) => to_value($call.await),
            Err(e) => CommandResponse::from_error(e),
        }
    };
}

/// Execute one request.
pub async fn dispatch(state: &AppState, request: IpcRequest) -> IpcResponse {
    let IpcRequest { id, command, args } = request;
    debug!("[IPC] {}", command);
    let cmd = command.as_str();

    let response = match cmd {
        // Lifecycle
        "init_app" => to_value(init::init_app(state).await),
        "get_version" => to_value(init::get_version()),
        "get_health" => to_value(health::get_health(state).await),
        "get_settings" => to_value(settings::get_settings(state).await),
        "update_settings" => {
            with_args!(cmd, args, |a: SettingsUpdate| settings::update_settings(state, a))
        }

        // Records
        "get_workspace" => to_value(workspace::get_workspace(state).await),
        "set_project_name" => {
            with_args!(cmd, args, |a: NameArgs| workspace::set_project_name(state, a.name))
        }
        "add_record" => to_value(workspace::add_record(state).await),
        "remove_record" => with_args!(cmd, args, |a: IdArgs| workspace::remove_record(state, a.id)),
        "update_field" => with_args!(cmd, args, |a: FieldArgs| workspace::update_field(
            state, a.id, a.field, a.value
        )),
        "add_quantity_row" => {
            with_args!(cmd, args, |a: IdArgs| workspace::add_quantity_row(state, a.id))
        }
        "remove_quantity_row" => with_args!(cmd, args, |a: RowArgs| workspace::remove_quantity_row(
            state, a.id, a.index
        )),
        "update_quantity_row" => with_args!(cmd, args, |a: RowCellArgs| {
            workspace::update_quantity_row(state, a.id, a.index, a.column, a.value)
        }),
        "reorder_records" => {
            with_args!(cmd, args, |a: MoveArgs| workspace::reorder_records(state, a.from, a.to))
        }
        "compute_total" => to_value(workspace::compute_total(state).await),

        // Drag and drop
        "drag_start" => with_args!(cmd, args, |a: IndexArgs| workspace::drag_start(state, a.index)),
        "drag_over" => with_args!(cmd, args, |a: PointerArgs| workspace::drag_over(
            state, a.index, a.x, a.bounds
        )),
        "drag_leave" => to_value(workspace::drag_leave(state).await),
        "drop_on_record" => with_args!(cmd, args, |a: PointerArgs| workspace::drop_on_record(
            state, a.index, a.x, a.bounds
        )),
        "drop_at_end" => to_value(workspace::drop_at_end(state).await),
        "drag_cancel" => to_value(workspace::drag_cancel(state).await),

        // Project files
        "new_project" => to_value(projects::new_project(state).await),
        "save_project" => to_value(projects::save_project(state).await),
        "open_project" => with_args!(cmd, args, |a: PathArgs| projects::open_project(state, a.path)),
        "import_project" => {
            with_args!(cmd, args, |a: ContentArgs| projects::import_project(state, a.content))
        }

        // Generation and artifacts
        "generate_drawings" => to_value(artifacts::generate_drawings(state).await),
        "generate_materials" => to_value(artifacts::generate_materials(state).await),
        "list_artifacts" => to_value(artifacts::list_artifacts(state).await),
        "download_artifact" => {
            with_args!(cmd, args, |a: IdArgs| artifacts::download_artifact(state, a.id))
        }
        "download_all_artifacts" => to_value(artifacts::download_all_artifacts(state).await),
        "delete_artifact" => with_args!(cmd, args, |a: IdArgs| artifacts::delete_artifact(state, a.id)),

        other => CommandResponse::from_error(AppError::not_found(format!("Unknown command: {}", other))),
    };

    IpcResponse { id, response }
}

/// Execute one JSON request line and render the response line.
pub async fn dispatch_line(state: &AppState, line: &str) -> String {
    let response = match serde_json::from_str::<IpcRequest>(line) {
        Ok(request) => dispatch(state, request).await,
        Err(e) => IpcResponse {
            id: None,
            response: CommandResponse::from_error(AppError::validation(format!(
                "Malformed request: {}",
                e
            ))),
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"data":null,"error":"Failed to encode response: {}","errorKind":"serialization"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}
