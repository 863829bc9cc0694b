//! Promotion of cached charts into permanent storage, and the stored-chart
//! operations built on it

use tracing::info;
use uuid::Uuid;

use crate::database::repositories::{CacheEntrySeaOrmRepository, StarmapSeaOrmRepository};
use crate::errors::{AppError, AppResult};
use crate::models::{
    NewStarmap, Starmap, StarmapListQuery, StarmapListResponse, StarmapResponse,
    UpdateStarmapRequest, local_instant, validate_title,
};

#[derive(Clone)]
pub struct StarmapService {
    cache: CacheEntrySeaOrmRepository,
    storage: StarmapSeaOrmRepository,
}

impl StarmapService {
    pub fn new(cache: CacheEntrySeaOrmRepository, storage: StarmapSeaOrmRepository) -> Self {
        Self { cache, storage }
    }

    /// Copy a cache entry into permanent storage. The cache entry is left as is,
    /// so promoting it twice yields two independent records.
    pub async fn promote(&self, cache_id: &str, title: Option<String>) -> AppResult<Starmap> {
        validate_title(title.as_deref())?;

        let entry = self
            .cache
            .find_by_id(cache_id)
            .await?
            .ok_or_else(|| AppError::not_found("cached starmap", cache_id))?;

        let fingerprint = entry.fingerprint;
        let observed_at = local_instant(
            fingerprint.year,
            fingerprint.month,
            fingerprint.day,
            fingerprint.hour,
            fingerprint.minute,
            fingerprint.utc_offset_hours,
        )?;

        let starmap = self
            .storage
            .create(NewStarmap {
                latitude: fingerprint.latitude,
                longitude: fingerprint.longitude,
                observed_at,
                utc_offset_hours: fingerprint.utc_offset_hours,
                title,
                image_data: entry.image_data,
            })
            .await?;

        info!(cache_id, starmap_id = %starmap.id, "Promoted cached chart to storage");
        Ok(starmap)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Starmap> {
        self.storage
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("starmap", id.to_string()))
    }

    /// Page of stored charts, newest first
    pub async fn list(&self, query: &StarmapListQuery) -> AppResult<StarmapListResponse> {
        let (skip, limit) = query.validate()?;
        let (items, total) = self.storage.list_paginated(skip, limit).await?;
        Ok(StarmapListResponse {
            items: items.iter().map(StarmapResponse::from).collect(),
            total,
            skip,
            limit,
        })
    }

    pub async fn update_metadata(&self, id: Uuid, request: UpdateStarmapRequest) -> AppResult<Starmap> {
        request.validate()?;
        self.storage
            .update_metadata(id, request)
            .await?
            .ok_or_else(|| AppError::not_found("starmap", id.to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.storage.delete(id).await? {
            info!(starmap_id = %id, "Deleted starmap");
            Ok(())
        } else {
            Err(AppError::not_found("starmap", id.to_string()))
        }
    }
}
