use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Address not found: {0}")]
    GeocodeNotFound(String),

    #[error("Geocoding failed: {0}")]
    GeocodeFailed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code the error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::GeocodeNotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::GeocodeFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, errors) = match self {
            AppError::NotFound(msg) => (msg, None),
            AppError::Validation(msg) => (msg.clone(), Some(vec![msg])),
            AppError::BadRequest(msg) => (msg, None),
            AppError::GeocodeNotFound(msg) => (msg, None),
            AppError::GeocodeFailed(msg) => {
                tracing::error!("Geocoding failed: {}", msg);
                (msg, None)
            }
            AppError::Conflict(msg) => (msg, None),
            AppError::PayloadTooLarge(msg) => (msg, None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
        };

        let body = Json(ApiResponse::error(message, errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_errors_are_distinct_from_validation() {
        let validation = AppError::Validation("All fields must be filled".to_string());
        let not_found = AppError::GeocodeNotFound("Address not found.".to_string());

        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::GeocodeFailed("timeout".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = AppError::Internal("lock poisoned".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
