//! SeaORM repository for permanently stored charts

use chrono::FixedOffset;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{prelude::Starmaps, starmaps};
use crate::errors::AppResult;
use crate::models::{NewStarmap, Starmap, UpdateStarmapRequest};

#[derive(Clone)]
pub struct StarmapSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl StarmapSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn create(&self, starmap: NewStarmap) -> AppResult<Starmap> {
        let now = chrono::Utc::now();

        let active_model = starmaps::ActiveModel {
            id: Set(Uuid::new_v4()),
            latitude: Set(starmap.latitude),
            longitude: Set(starmap.longitude),
            observed_at: Set(starmap.observed_at),
            utc_offset_hours: Set(starmap.utc_offset_hours),
            title: Set(starmap.title),
            image_data: Set(starmap.image_data),
            extra_data: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Starmap>> {
        let model = Starmaps::find_by_id(id).one(&*self.connection).await?;
        Ok(model.map(Self::model_to_domain))
    }

    /// Page of records, newest first, with the total record count
    pub async fn list_paginated(&self, skip: u64, limit: u64) -> AppResult<(Vec<Starmap>, u64)> {
        let total = Starmaps::find().count(&*self.connection).await?;

        let models = Starmaps::find()
            .order_by_desc(starmaps::Column::CreatedAt)
            .order_by_desc(starmaps::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.connection)
            .await?;

        Ok((
            models.into_iter().map(Self::model_to_domain).collect(),
            total,
        ))
    }

    /// Replace the supplied metadata fields; `None` leaves a field unchanged
    pub async fn update_metadata(
        &self,
        id: Uuid,
        request: UpdateStarmapRequest,
    ) -> AppResult<Option<Starmap>> {
        let Some(existing) = Starmaps::find_by_id(id).one(&*self.connection).await? else {
            return Ok(None);
        };

        let mut active_model: starmaps::ActiveModel = existing.into();
        if let Some(title) = request.title {
            active_model.title = Set(Some(title));
        }
        if let Some(extra_data) = request.extra_data {
            active_model.extra_data = Set(Some(extra_data));
        }
        active_model.updated_at = Set(chrono::Utc::now());

        let model = active_model.update(&*self.connection).await?;
        Ok(Some(Self::model_to_domain(model)))
    }

    /// Returns whether a record was removed
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = Starmaps::delete_by_id(id).exec(&*self.connection).await?;
        Ok(result.rows_affected > 0)
    }

    fn model_to_domain(model: starmaps::Model) -> Starmap {
        // PostgreSQL normalises timestamptz to UTC; restore the observer's offset
        let observed_at = match FixedOffset::east_opt(model.utc_offset_hours * 3600) {
            Some(offset) => model.observed_at.with_timezone(&offset),
            None => model.observed_at,
        };

        Starmap {
            id: model.id,
            latitude: model.latitude,
            longitude: model.longitude,
            observed_at,
            utc_offset_hours: model.utc_offset_hours,
            title: model.title,
            image_data: model.image_data,
            extra_data: model.extra_data,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
