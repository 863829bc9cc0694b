//! HTTP response types and error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, warn};

use crate::errors::AppError;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ApiResponse {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_with_details(message: String, details: HashMap<String, String>) -> Self {
        Self {
            details: Some(details),
            ..Self::error(message)
        }
    }
}

/// Convert AppError to the matching status code and error body
pub fn handle_error(error: AppError) -> Response {
    let (status, message, details) = match &error {
        AppError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone(), None),
        AppError::NotFound { resource, id } => (
            StatusCode::NOT_FOUND,
            format!("{} with id '{}' not found", resource, id),
            None,
        ),
        AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message.clone(), None),
        AppError::InvalidInstant {
            instant,
            valid_from,
            valid_until,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Requested time is outside the supported ephemeris range".to_string(),
            Some(HashMap::from([
                ("instant".to_string(), instant.clone()),
                ("valid_from".to_string(), valid_from.clone()),
                ("valid_until".to_string(), valid_until.clone()),
            ])),
        ),
        AppError::GenerationFailure { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Chart generation failed".to_string(),
            None,
        ),
        AppError::StoreUnavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Storage is unavailable".to_string(),
            None,
        ),
        AppError::Catalog { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Star catalog is unavailable".to_string(),
            None,
        ),
        AppError::Configuration { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Configuration error: {}", message),
            None,
        ),
        AppError::Http(_) => (
            StatusCode::BAD_GATEWAY,
            "External service communication failed".to_string(),
            None,
        ),
    };

    if error.is_client_error() {
        warn!(status = status.as_u16(), "{}", error);
    } else {
        error!(status = status.as_u16(), "{}", error);
    }

    let body = match details {
        Some(details) => ApiResponse::error_with_details(message, details),
        None => ApiResponse::error(message),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_error(self)
    }
}

pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
