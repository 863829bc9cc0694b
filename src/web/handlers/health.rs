use axum::{extract::State, response::Response};
use serde::Serialize;

use crate::web::{AppState, responses::ok};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cache: CacheHealth,
    pub storage: StoreHealth,
    pub cache_store: StoreHealth,
}

#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub max_age: String,
    pub sweep_interval: String,
}

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub backend: &'static str,
}

/// Liveness plus the effective cache settings and store backends
pub async fn health_check(State(state): State<AppState>) -> Response {
    let cache = &state.config.cache;
    ok(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        cache: CacheHealth {
            max_age: humantime::format_duration(cache.max_age).to_string(),
            sweep_interval: humantime::format_duration(cache.sweep_interval).to_string(),
        },
        storage: StoreHealth {
            backend: state.storage_backend.as_str(),
        },
        cache_store: StoreHealth {
            backend: state.cache_backend.as_str(),
        },
    })
}
