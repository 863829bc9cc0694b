//! Two-tier lookup: serve a cached chart or render and remember a new one

use std::sync::Arc;
use tracing::{debug, info};

use super::generator::ChartGenerator;
use crate::database::repositories::CacheEntrySeaOrmRepository;
use crate::errors::AppResult;
use crate::models::{CacheFingerprint, GenerateStarmapRequest, GeneratedChart};

#[derive(Clone)]
pub struct ChartCacheService {
    repository: CacheEntrySeaOrmRepository,
    generator: Arc<dyn ChartGenerator>,
}

impl ChartCacheService {
    pub fn new(repository: CacheEntrySeaOrmRepository, generator: Arc<dyn ChartGenerator>) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Return the cached image for the request's fingerprint, rendering and
    /// storing it on a miss. Nothing is stored when validation or rendering fails.
    pub async fn get_or_generate(&self, request: &GenerateStarmapRequest) -> AppResult<GeneratedChart> {
        let observer = request.validate()?;
        let fingerprint = CacheFingerprint::from(&observer);

        if let Some(entry) = self.repository.find_by_fingerprint(&fingerprint).await? {
            debug!(cache_id = %entry.id, "Chart cache hit");
            return Ok(GeneratedChart {
                image_data: entry.image_data,
                cache_id: entry.id,
                cache_hit: true,
            });
        }

        let image_data = self
            .generator
            .generate(&fingerprint.observer(), request.title.as_deref())
            .await?;

        let entry = self
            .repository
            .create(&fingerprint, image_data, chrono::Utc::now())
            .await?;

        info!(
            cache_id = %entry.id,
            latitude = fingerprint.latitude,
            longitude = fingerprint.longitude,
            bytes = entry.image_data.len(),
            "Generated and cached chart"
        );

        Ok(GeneratedChart {
            image_data: entry.image_data,
            cache_id: entry.id,
            cache_hit: false,
        })
    }
}
