use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{extract::State, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;

/// List every manager with the formatted tax id, ordered for display.
pub async fn list_managers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let managers = state
        .warehouses
        .list_managers()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "success": true,
        "managers": managers,
    })))
}
