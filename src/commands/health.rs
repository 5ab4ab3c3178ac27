//! Health Check Commands
//!
//! Commands for checking the health status of backend services.

use crate::models::response::{CommandResponse, HealthResponse};
use crate::state::AppState;

/// Get the health status of local storage and the generation service
pub async fn get_health(state: &AppState) -> CommandResponse<HealthResponse> {
    let mut health = HealthResponse::default();

    // Check database health
    health.database = state.is_database_healthy();

    // Check config health
    health.config = state.is_config_healthy();

    // Probe the drawing service
    health.generation_service = match state.designer().await {
        Ok(designer) => designer.service_health().await,
        Err(_) => false,
    };

    // Overall status
    health.status = if health.database && health.config && health.generation_service {
        "healthy".to_string()
    } else {
        "degraded".to_string()
    };

    CommandResponse::ok(health)
}
