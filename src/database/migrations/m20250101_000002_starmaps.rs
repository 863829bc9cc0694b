use sea_orm_migration::prelude::*;

use super::{id_column, timestamp_column};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut extra_data = ColumnDef::new(Starmaps::ExtraData);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => extra_data.json_binary(),
            _ => extra_data.text(),
        };

        manager
            .create_table(
                Table::create()
                    .table(Starmaps::Table)
                    .if_not_exists()
                    .col(id_column(manager, Starmaps::Id))
                    .col(ColumnDef::new(Starmaps::Latitude).double().not_null())
                    .col(ColumnDef::new(Starmaps::Longitude).double().not_null())
                    .col(timestamp_column(manager, Starmaps::ObservedAt))
                    .col(ColumnDef::new(Starmaps::UtcOffsetHours).integer().not_null())
                    .col(ColumnDef::new(Starmaps::Title).string_len(255))
                    .col(ColumnDef::new(Starmaps::ImageData).blob().not_null())
                    .col(extra_data)
                    .col(timestamp_column(manager, Starmaps::CreatedAt))
                    .col(timestamp_column(manager, Starmaps::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_starmaps_location")
                    .table(Starmaps::Table)
                    .col(Starmaps::Latitude)
                    .col(Starmaps::Longitude)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_starmaps_observed_at")
                    .table(Starmaps::Table)
                    .col(Starmaps::ObservedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_starmaps_created_at")
                    .table(Starmaps::Table)
                    .col(Starmaps::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Starmaps::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Starmaps {
    Table,
    Id,
    Latitude,
    Longitude,
    ObservedAt,
    UtcOffsetHours,
    Title,
    ImageData,
    ExtraData,
    CreatedAt,
    UpdatedAt,
}
