//! Chart generation and stored-chart handlers

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{
    GenerateStarmapRequest, SaveStarmapRequest, StarmapListQuery, StarmapResponse,
    UpdateStarmapRequest,
};
use crate::web::{
    AppState,
    responses::{created, no_content, ok},
};

pub const CACHE_ID_HEADER: &str = "x-cache-id";
pub const CACHE_HIT_HEADER: &str = "x-cache-hit";

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

fn parse_starmap_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found("starmap", id))
}

fn png_response(image_data: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("inline; filename=starmap.png"),
            ),
        ],
        image_data,
    )
        .into_response()
}

/// Render a chart, or serve it from the cache
pub async fn generate_starmap(
    State(state): State<AppState>,
    body: Result<Json<GenerateStarmapRequest>, JsonRejection>,
) -> AppResult<Response> {
    let request = json_body(body)?;
    let chart = state.chart_cache.get_or_generate(&request).await?;

    let mut response = png_response(chart.image_data);
    let headers = response.headers_mut();
    headers.insert(
        CACHE_ID_HEADER,
        HeaderValue::from_str(&chart.cache_id)
            .map_err(|e| AppError::generation(format!("invalid cache id header: {e}")))?,
    );
    headers.insert(
        CACHE_HIT_HEADER,
        HeaderValue::from_static(if chart.cache_hit { "true" } else { "false" }),
    );
    Ok(response)
}

/// Promote a cached chart to permanent storage
pub async fn save_starmap(
    State(state): State<AppState>,
    Path(cache_id): Path<String>,
    body: Option<Json<SaveStarmapRequest>>,
) -> AppResult<Response> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let starmap = state.starmaps.promote(&cache_id, request.title).await?;
    Ok(created(StarmapResponse::from(&starmap)))
}

pub async fn list_starmaps(
    State(state): State<AppState>,
    Query(query): Query<StarmapListQuery>,
) -> AppResult<Response> {
    Ok(ok(state.starmaps.list(&query).await?))
}

pub async fn get_starmap_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let starmap = state.starmaps.get(parse_starmap_id(&id)?).await?;
    Ok(png_response(starmap.image_data))
}

pub async fn get_starmap_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let starmap = state.starmaps.get(parse_starmap_id(&id)?).await?;
    Ok(ok(StarmapResponse::from(&starmap)))
}

pub async fn update_starmap(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateStarmapRequest>, JsonRejection>,
) -> AppResult<Response> {
    let id = parse_starmap_id(&id)?;
    let request = json_body(body)?;
    let starmap = state.starmaps.update_metadata(id, request).await?;
    Ok(ok(StarmapResponse::from(&starmap)))
}

pub async fn delete_starmap(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.starmaps.delete(parse_starmap_id(&id)?).await?;
    Ok(no_content())
}
