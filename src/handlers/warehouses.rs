use super::common::{map_service_error, parse_id, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::warehouses::{NewWarehouse, WarehouseDetail, WarehouseUpdate},
    validation::{sanitize_manager_ids, validate_warehouse, WarehouseForm},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

// Request and response DTOs

/// Fields submitted by the admin form, for both create and edit. Values
/// arrive as raw strings (the form does no coercion); `code` is only present
/// on create and `active` defaults to false when the checkbox is unchecked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWarehouseRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub staff_count: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub manager_ids: Vec<serde_json::Value>,
}

impl SaveWarehouseRequest {
    fn form(&self) -> WarehouseForm {
        WarehouseForm {
            code: self.code.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            staff_count: self.staff_count.clone(),
        }
    }

    /// The staff count as an integer. Only meaningful after validation, which
    /// guarantees an all-digit string within range.
    fn staff_count_value(&self) -> Result<i32, ApiError> {
        self.staff_count
            .trim()
            .parse::<i32>()
            .map_err(|_| ApiError::BadRequest("Invalid staff count.".to_string()))
    }

    /// Usable manager ids, or a per-field error when none survive filtering.
    fn manager_ids(&self) -> Result<Vec<i32>, ApiError> {
        let ids = sanitize_manager_ids(&self.manager_ids);
        if ids.is_empty() {
            return Err(ApiError::field(
                "managers",
                "At least one manager must be assigned.",
            ));
        }
        Ok(ids)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WarehouseResponse {
    id: i32,
    code: String,
    name: String,
    address: String,
    staff_count: i32,
    active: bool,
    created_at: DateTime<Utc>,
    manager_ids: Vec<i32>,
}

impl From<WarehouseDetail> for WarehouseResponse {
    fn from(detail: WarehouseDetail) -> Self {
        let w = detail.warehouse;
        Self {
            id: w.id,
            code: w.code,
            name: w.name,
            address: w.address,
            staff_count: w.staff_count,
            active: w.active,
            created_at: w.created_at,
            manager_ids: detail.manager_ids,
        }
    }
}

// Handler functions

/// Create a new warehouse
async fn create_warehouse(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveWarehouseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let errors = validate_warehouse(&payload.form(), false);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Friendly pre-check; the unique index remains the authoritative guard
    // when two creators race.
    let code = payload.code.as_deref().unwrap_or("");
    if state
        .warehouses
        .code_exists(code, None)
        .await
        .map_err(map_service_error)?
    {
        return Err(ApiError::field("code", "Code is already in use."));
    }

    let manager_ids = payload.manager_ids()?;
    let data = NewWarehouse {
        code: code.to_string(),
        name: payload.name.clone(),
        address: payload.address.clone(),
        staff_count: payload.staff_count_value()?,
        active: payload.active,
    };

    let id = state
        .warehouses
        .create(data, manager_ids)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "success": true,
        "message": "Warehouse created successfully.",
        "id": id,
    })))
}

/// Get a warehouse by id, with its assigned manager ids
async fn get_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let detail = state
        .warehouses
        .get_by_id(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("Warehouse not found.".to_string()))?;

    Ok(success_response(json!({
        "success": true,
        "warehouse": WarehouseResponse::from(detail),
    })))
}

/// Update a warehouse and replace its manager set
async fn update_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<SaveWarehouseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    // Code is immutable after creation, so it is not validated here.
    let errors = validate_warehouse(&payload.form(), true);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let manager_ids = payload.manager_ids()?;
    let data = WarehouseUpdate {
        name: payload.name.clone(),
        address: payload.address.clone(),
        staff_count: payload.staff_count_value()?,
        active: payload.active,
    };

    state
        .warehouses
        .edit(id, data, manager_ids)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "success": true,
        "message": "Warehouse updated successfully.",
    })))
}

/// Delete a warehouse
async fn delete_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    state
        .warehouses
        .delete(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "success": true,
        "message": "Warehouse deleted successfully.",
    })))
}

pub fn warehouse_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_warehouse))
        .route("/:id", get(get_warehouse).post(update_warehouse))
        .route("/:id/delete", post(delete_warehouse))
}
