use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation errors, keyed by the JSON field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Errors produced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Code '{0}' is already in use")]
    DuplicateCode(String),

    #[error("At least one manager must be assigned")]
    EmptyManagerSet,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Connectivity failures are reported as 503, everything else the
            // database throws at us is a plain 500.
            Self::DatabaseError(DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateCode(_) | Self::EmptyManagerSet => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the message exposed to API clients. Internal causes are
    /// replaced with a generic message.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
                "Database connection error".to_string()
            }
            Self::DatabaseError(_) => "Database error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Errors surfaced at the HTTP boundary. Every variant serializes to the
/// `{"success": false, ...}` envelope the browser client expects.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// A validation failure on a single field.
    pub fn field(name: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(name, message.into());
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "success": false, "errors": errors })),
            )
                .into_response(),
            // Field-shaped service rejections keep the per-field envelope so
            // the client can render them next to the offending input.
            ApiError::Service(err @ ServiceError::DuplicateCode(_)) => (
                err.status_code(),
                Json(json!({ "success": false, "errors": { "code": err.response_message() } })),
            )
                .into_response(),
            ApiError::Service(err @ ServiceError::EmptyManagerSet) => (
                err.status_code(),
                Json(json!({ "success": false, "errors": { "managers": err.response_message() } })),
            )
                .into_response(),
            ApiError::Service(err) => (
                err.status_code(),
                Json(json!({ "success": false, "message": err.response_message() })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::DuplicateCode("BOD1".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::EmptyManagerSet.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::InvalidInput("id".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn database_errors_hide_details() {
        let err = ServiceError::DatabaseError(DbErr::Custom("secret dsn".into()));
        assert_eq!(err.response_message(), "Database error");
    }
}
