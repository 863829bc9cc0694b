//! SeaORM-based database access
//!
//! The cache store and the permanent store are each a [`Database`] with its
//! own connection pool and migrator. SQLite and PostgreSQL are supported.

use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database as SeaOrmDatabase, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{DatabaseConfig, defaults::DEFAULT_MAX_CONNECTIONS};

pub mod migrations;
pub mod repositories;

/// Database connection manager
#[derive(Clone)]
pub struct Database {
    pub connection: Arc<DatabaseConnection>,
    pub database_type: DatabaseType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    SQLite,
    PostgreSQL,
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::SQLite => "sqlite",
            DatabaseType::PostgreSQL => "postgresql",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Database {
    /// Open a connection pool for the configured URL
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_type = Self::detect_database_type(&config.url)?;

        info!("Connecting to {} database", database_type.as_str());

        let connection_url = match database_type {
            DatabaseType::SQLite => Self::ensure_sqlite_auto_creation(&config.url)?,
            DatabaseType::PostgreSQL => config.url.clone(),
        };

        let mut connect_options = ConnectOptions::new(&connection_url);
        connect_options
            .max_connections(config.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
            .min_connections(1)
            .connect_timeout(Duration::from_secs(5))
            .acquire_timeout(Duration::from_secs(3))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        let connection = match SeaOrmDatabase::connect(connect_options).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Database connection failed: {:?}", e);
                let mut source = e.source();
                let mut level = 0;
                while let Some(err) = source {
                    tracing::error!("  Level {}: {}", level, err);
                    source = err.source();
                    level += 1;
                }
                return Err(anyhow::anyhow!(
                    "Failed to connect to database at '{}': {}",
                    &config.url,
                    e
                ));
            }
        };

        debug!("Database connection established successfully");

        Ok(Self {
            connection: Arc::new(connection),
            database_type,
        })
    }

    /// Apply every pending migration of `M`
    pub async fn migrate<M: MigratorTrait>(&self) -> Result<()> {
        info!("Running {} database migrations", self.database_type);
        M::up(&*self.connection, None)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations completed");
        Ok(())
    }

    fn detect_database_type(url: &str) -> Result<DatabaseType> {
        if url.starts_with("sqlite:") {
            Ok(DatabaseType::SQLite)
        } else if url.starts_with("postgres:") || url.starts_with("postgresql:") {
            Ok(DatabaseType::PostgreSQL)
        } else {
            anyhow::bail!("Unsupported database URL format: {}", url);
        }
    }

    /// Ensure a file-backed SQLite URL creates its file on first use
    fn ensure_sqlite_auto_creation(url: &str) -> Result<String> {
        if url.contains("mode=") || url.contains(":memory:") {
            return Ok(url.to_string());
        }

        let file_path = if let Some(path) = url.strip_prefix("sqlite://") {
            path
        } else if let Some(path) = url.strip_prefix("sqlite:") {
            path
        } else {
            anyhow::bail!("Invalid SQLite URL format: {}", url);
        };
        let file_path = file_path.split('?').next().unwrap_or(file_path);

        let path = std::path::Path::new(file_path);
        if path.exists() {
            return Ok(url.to_string());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create directory for SQLite database: {}",
                        parent.display()
                    )
                })?;
                info!("Created directory for SQLite database: {}", parent.display());
            }
        }

        let auto_create_url = if url.contains('?') {
            format!("{}&mode=rwc", url)
        } else {
            format!("{}?mode=rwc", url)
        };
        debug!("SQLite URL rewritten for auto-creation: {}", auto_create_url);
        Ok(auto_create_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::{CacheMigrator, StorageMigrator};

    #[test]
    fn test_detect_database_type() {
        assert_eq!(
            Database::detect_database_type("sqlite://./data/cache.db").unwrap(),
            DatabaseType::SQLite
        );
        assert_eq!(
            Database::detect_database_type("postgres://user@localhost/charts").unwrap(),
            DatabaseType::PostgreSQL
        );
        assert!(Database::detect_database_type("mysql://localhost/charts").is_err());
    }

    #[test]
    fn test_sqlite_auto_creation_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("cache.db");
        let url = format!("sqlite://{}", db_path.display());

        let rewritten = Database::ensure_sqlite_auto_creation(&url).unwrap();
        assert_eq!(rewritten, format!("{url}?mode=rwc"));
        assert!(dir.path().join("nested").is_dir());

        assert_eq!(
            Database::ensure_sqlite_auto_creation("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
    }

    #[tokio::test]
    async fn test_both_schemas_can_share_one_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("shared.db").display());
        let database = Database::new(&DatabaseConfig {
            url,
            max_connections: Some(1),
        })
        .await
        .unwrap();

        database.migrate::<CacheMigrator>().await.unwrap();
        database.migrate::<StorageMigrator>().await.unwrap();
        // Re-running is a no-op
        database.migrate::<CacheMigrator>().await.unwrap();
        assert_eq!(database.database_type, DatabaseType::SQLite);
    }
}
