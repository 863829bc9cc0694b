//! HTTP interface
//!
//! Chart routes live under `/api/v1/starmaps`; `/health` sits at the root and
//! is never behind the API key.

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::database::DatabaseType;
use crate::services::{ChartCacheService, StarmapService};

pub mod handlers;
pub mod middleware;
pub mod responses;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chart_cache: ChartCacheService,
    pub starmaps: StarmapService,
    pub cache_backend: DatabaseType,
    pub storage_backend: DatabaseType,
}

/// Build the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let starmap_routes = Router::new()
        .route(
            "/api/v1/starmaps",
            get(handlers::starmaps::list_starmaps),
        )
        .route(
            "/api/v1/starmaps/generate",
            post(handlers::starmaps::generate_starmap),
        )
        .route(
            "/api/v1/starmaps/{id}",
            get(handlers::starmaps::get_starmap_image)
                .patch(handlers::starmaps::update_starmap)
                .delete(handlers::starmaps::delete_starmap),
        )
        .route(
            "/api/v1/starmaps/{id}/metadata",
            get(handlers::starmaps::get_starmap_metadata),
        )
        .route(
            "/api/v1/starmaps/{id}/save",
            post(handlers::starmaps::save_starmap),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::api_key_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(starmap_routes)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(middleware::request_logging_middleware))
        .with_state(state)
}

pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", state.config.web.host, state.config.web.port)
            .parse()
            .map_err(|e| {
                anyhow::anyhow!(
                    "Invalid listen address {}:{}: {}",
                    state.config.web.host,
                    state.config.web.port,
                    e
                )
            })?;
        Ok(Self {
            app: router(state),
            addr,
        })
    }

    /// Serve until `cancellation_token` is cancelled, then drain in-flight requests
    pub async fn serve_with_cancellation(self, cancellation_token: CancellationToken) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.addr, e))?;
        info!("Listening on http://{}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                cancellation_token.cancelled().await;
                info!("Web server received cancellation signal, shutting down gracefully");
            })
            .await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}
