//! HTTP middleware: request logging and API key enforcement

use axum::{
    extract::{Request, State},
    http::{Method, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use super::AppState;
use crate::errors::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Logs every request with its status and timing
pub async fn request_logging_middleware(
    method: Method,
    uri: Uri,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let duration = start.elapsed();

    if status >= 400 {
        warn!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %request_id,
            duration_ms = duration.as_millis(),
            "HTTP request completed with error"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %request_id,
            duration_ms = duration.as_millis(),
            "HTTP request completed"
        );
    }

    response
}

/// Rejects requests without the configured `X-API-Key`. A no-op when no key
/// is configured.
pub async fn api_key_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.config.web.api_key.as_deref() else {
        return next.run(request).await;
    };

    match request.headers().get(API_KEY_HEADER) {
        None => AppError::unauthorized("Missing API key").into_response(),
        Some(provided) if api_key_matches(provided.as_bytes(), expected.as_bytes()) => {
            next.run(request).await
        }
        Some(_) => AppError::unauthorized("Invalid API key").into_response(),
    }
}

/// Compare keys in time independent of how many leading bytes match
fn api_key_matches(provided: &[u8], expected: &[u8]) -> bool {
    provided.ct_eq(expected).into()
}
