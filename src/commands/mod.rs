//! Commands
//!
//! Contains all command handlers that can be called from the frontend.
//! These are the IPC entry points for the application; `dispatch` routes
//! JSON requests onto them.

pub mod artifacts;
pub mod dispatch;
pub mod health;
pub mod init;
pub mod projects;
pub mod settings;
pub mod workspace;

pub use artifacts::*;
pub use dispatch::{dispatch, dispatch_line, IpcRequest, IpcResponse};
pub use health::*;
pub use init::*;
pub use projects::*;
pub use settings::*;
pub use workspace::*;

use std::future::Future;
use std::sync::Arc;

use crate::models::response::CommandResponse;
use crate::services::DesignerService;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Run `f` against the designer service, folding every failure into the
/// response.
pub(crate) async fn with_designer<F, Fut, T>(state: &AppState, f: F) -> CommandResponse<T>
where
    F: FnOnce(Arc<DesignerService>) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    match state.designer().await {
        Ok(designer) => f(designer).await.into(),
        Err(e) => CommandResponse::from_error(e),
    }
}
