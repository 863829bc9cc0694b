//! SeaORM repository for cached chart images

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{cached_starmaps, prelude::CachedStarmaps};
use crate::errors::{AppError, AppResult};
use crate::models::{CacheEntry, CacheFingerprint};

#[derive(Clone)]
pub struct CacheEntrySeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl CacheEntrySeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    /// Most recent entry stored for an exact fingerprint
    pub async fn find_by_fingerprint(
        &self,
        fingerprint: &CacheFingerprint,
    ) -> AppResult<Option<CacheEntry>> {
        let model = CachedStarmaps::find()
            .filter(cached_starmaps::Column::Latitude.eq(fingerprint.latitude))
            .filter(cached_starmaps::Column::Longitude.eq(fingerprint.longitude))
            .filter(cached_starmaps::Column::Year.eq(fingerprint.year))
            .filter(cached_starmaps::Column::Month.eq(fingerprint.month as i32))
            .filter(cached_starmaps::Column::Day.eq(fingerprint.day as i32))
            .filter(cached_starmaps::Column::Hour.eq(fingerprint.hour as i32))
            .filter(cached_starmaps::Column::Minute.eq(fingerprint.minute as i32))
            .filter(cached_starmaps::Column::UtcOffsetHours.eq(fingerprint.utc_offset_hours))
            .order_by_desc(cached_starmaps::Column::CreatedAt)
            .one(&*self.connection)
            .await?;

        model.map(Self::model_to_domain).transpose()
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<CacheEntry>> {
        let model = CachedStarmaps::find_by_id(id.to_string())
            .one(&*self.connection)
            .await?;
        model.map(Self::model_to_domain).transpose()
    }

    /// Store a rendered image under a fresh identifier
    pub async fn create(
        &self,
        fingerprint: &CacheFingerprint,
        image_data: Vec<u8>,
        created_at: DateTime<Utc>,
    ) -> AppResult<CacheEntry> {
        let active_model = cached_starmaps::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            latitude: Set(fingerprint.latitude),
            longitude: Set(fingerprint.longitude),
            year: Set(fingerprint.year),
            month: Set(fingerprint.month as i32),
            day: Set(fingerprint.day as i32),
            hour: Set(fingerprint.hour as i32),
            minute: Set(fingerprint.minute as i32),
            utc_offset_hours: Set(fingerprint.utc_offset_hours),
            image_data: Set(image_data),
            created_at: Set(created_at),
        };

        let model = active_model.insert(&*self.connection).await?;
        Self::model_to_domain(model)
    }

    /// Remove every entry created strictly before `cutoff`
    pub async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = CachedStarmaps::delete_many()
            .filter(cached_starmaps::Column::CreatedAt.lt(cutoff))
            .exec(&*self.connection)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(CachedStarmaps::find().count(&*self.connection).await?)
    }

    fn model_to_domain(model: cached_starmaps::Model) -> AppResult<CacheEntry> {
        let field = |name: &str, value: i32| {
            u32::try_from(value).map_err(|_| {
                AppError::generation(format!(
                    "cache entry {} has invalid {name} {value}",
                    model.id
                ))
            })
        };

        let fingerprint = CacheFingerprint {
            latitude: model.latitude,
            longitude: model.longitude,
            year: model.year,
            month: field("month", model.month)?,
            day: field("day", model.day)?,
            hour: field("hour", model.hour)?,
            minute: field("minute", model.minute)?,
            utc_offset_hours: model.utc_offset_hours,
        };

        Ok(CacheEntry {
            id: model.id,
            fingerprint,
            image_data: model.image_data,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::{Database, migrations::CacheMigrator};
    use chrono::Duration;

    async fn repository() -> CacheEntrySeaOrmRepository {
        let database = Database::new(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: Some(1),
        })
        .await
        .unwrap();
        database.migrate::<CacheMigrator>().await.unwrap();
        CacheEntrySeaOrmRepository::new(database.connection.clone())
    }

    fn fingerprint() -> CacheFingerprint {
        CacheFingerprint {
            latitude: 40.7128,
            longitude: -74.006,
            year: 2024,
            month: 6,
            day: 15,
            hour: 22,
            minute: 30,
            utc_offset_hours: -4,
        }
    }

    #[tokio::test]
    async fn test_lookup_requires_every_field_to_match() {
        let repo = repository().await;
        let stored = repo
            .create(&fingerprint(), vec![1, 2, 3], Utc::now())
            .await
            .unwrap();

        let found = repo.find_by_fingerprint(&fingerprint()).await.unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert_eq!(found.image_data, vec![1, 2, 3]);
        assert_eq!(found.fingerprint, fingerprint());

        let mut other_minute = fingerprint();
        other_minute.minute = 31;
        assert!(repo.find_by_fingerprint(&other_minute).await.unwrap().is_none());

        let mut other_offset = fingerprint();
        other_offset.utc_offset_hours = -5;
        assert!(repo.find_by_fingerprint(&other_offset).await.unwrap().is_none());

        assert_eq!(repo.find_by_id(&stored.id).await.unwrap(), Some(stored));
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_created_before_is_strict() {
        let repo = repository().await;
        let now = Utc::now();
        repo.create(&fingerprint(), vec![0], now - Duration::hours(25))
            .await
            .unwrap();
        let recent = repo
            .create(&fingerprint(), vec![1], now - Duration::hours(1))
            .await
            .unwrap();

        let removed = repo
            .delete_created_before(now - Duration::hours(24))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.count().await.unwrap(), 1);

        // An entry exactly at the cutoff survives
        let removed = repo.delete_created_before(recent.created_at).await.unwrap();
        assert_eq!(removed, 0);
    }
}
