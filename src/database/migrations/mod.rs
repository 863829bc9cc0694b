//! SeaORM migrations for the cache and storage databases
//!
//! The two stores are migrated independently and keep their migration history
//! in separate tables, so both may share a single database when configured to.

use sea_orm_migration::prelude::*;

pub mod m20250101_000001_cached_starmaps;
pub mod m20250101_000002_starmaps;

/// Schema of the regeneratable chart cache
pub struct CacheMigrator;

#[async_trait::async_trait]
impl MigratorTrait for CacheMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_cached_starmaps::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("cache_migrations").into_iden()
    }
}

/// Schema of the permanent chart storage
pub struct StorageMigrator;

#[async_trait::async_trait]
impl MigratorTrait for StorageMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000002_starmaps::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("storage_migrations").into_iden()
    }
}

/// Column helpers shared by both schemas
pub(crate) fn id_column(manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
    let mut col = ColumnDef::new(column);
    match manager.get_database_backend() {
        sea_orm::DatabaseBackend::Postgres => col.uuid().not_null().primary_key(),
        _ => col.string().not_null().primary_key(),
    };
    col
}

pub(crate) fn timestamp_column(manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
    let mut col = ColumnDef::new(column);
    match manager.get_database_backend() {
        sea_orm::DatabaseBackend::Postgres => col.timestamp_with_time_zone().not_null(),
        _ => col.string().not_null(),
    };
    col
}
