pub mod common;
pub mod health;
pub mod managers;
pub mod page;
pub mod warehouses;

use crate::{config::AppConfig, db::DbPool, services::WarehouseService};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub warehouses: WarehouseService,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        let warehouses = WarehouseService::new(db.clone());
        Self {
            db,
            config,
            warehouses,
        }
    }
}

/// Builds the full application router: admin page, JSON API, health check
/// and static assets. Unknown routes get a JSON 404; a wrong method on a
/// known route yields 405 from axum's method routing.
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(page::index))
        .nest("/api/warehouses", warehouses::warehouse_routes())
        .route("/api/managers", get(managers::list_managers))
        .route("/health", get(health::health))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Action not found." })),
    )
}
