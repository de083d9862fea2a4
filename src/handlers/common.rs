use crate::errors::{ApiError, ServiceError};
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::Service(err)
}

/// Parses a path id the way the original validates its `id` inputs: it must
/// be a positive integer, anything else is a 400.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or_else(|| ApiError::BadRequest("Invalid id.".to_string()))
}
