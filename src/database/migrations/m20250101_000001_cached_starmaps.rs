use sea_orm_migration::prelude::*;

use super::timestamp_column;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CachedStarmaps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedStarmaps::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CachedStarmaps::Latitude).double().not_null())
                    .col(ColumnDef::new(CachedStarmaps::Longitude).double().not_null())
                    .col(ColumnDef::new(CachedStarmaps::Year).integer().not_null())
                    .col(ColumnDef::new(CachedStarmaps::Month).integer().not_null())
                    .col(ColumnDef::new(CachedStarmaps::Day).integer().not_null())
                    .col(ColumnDef::new(CachedStarmaps::Hour).integer().not_null())
                    .col(ColumnDef::new(CachedStarmaps::Minute).integer().not_null())
                    .col(
                        ColumnDef::new(CachedStarmaps::UtcOffsetHours)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CachedStarmaps::ImageData).blob().not_null())
                    .col(timestamp_column(manager, CachedStarmaps::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cache_lookup")
                    .table(CachedStarmaps::Table)
                    .col(CachedStarmaps::Latitude)
                    .col(CachedStarmaps::Longitude)
                    .col(CachedStarmaps::Year)
                    .col(CachedStarmaps::Month)
                    .col(CachedStarmaps::Day)
                    .col(CachedStarmaps::Hour)
                    .col(CachedStarmaps::Minute)
                    .col(CachedStarmaps::UtcOffsetHours)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cache_created_at")
                    .table(CachedStarmaps::Table)
                    .col(CachedStarmaps::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CachedStarmaps::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CachedStarmaps {
    Table,
    Id,
    Latitude,
    Longitude,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    UtcOffsetHours,
    ImageData,
    CreatedAt,
}
