//! Process-wide star catalog and ephemeris, loaded once on first use.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::catalog::StarCatalog;
use super::ephemeris::{AnalyticEarthEphemeris, Ephemeris};
use crate::config::SkyConfig;
use crate::errors::{AppError, AppResult};

/// Read-only reference data shared by every chart request
pub struct SkyData {
    pub catalog: StarCatalog,
    pub ephemeris: Arc<dyn Ephemeris>,
}

impl SkyData {
    pub fn new(catalog: StarCatalog, ephemeris: Arc<dyn Ephemeris>) -> Self {
        Self { catalog, ephemeris }
    }
}

impl std::fmt::Debug for SkyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkyData")
            .field("stars", &self.catalog.len())
            .field("ephemeris_span", &self.ephemeris.valid_span())
            .finish()
    }
}

/// Lazily loads [`SkyData`] exactly once; concurrent first callers share the load
pub struct SkyDataProvider {
    config: SkyConfig,
    data: OnceCell<Arc<SkyData>>,
}

impl SkyDataProvider {
    pub fn new(config: SkyConfig) -> Self {
        Self {
            config,
            data: OnceCell::new(),
        }
    }

    /// Provider with data already in place, used by tests and embedders
    pub fn preloaded(config: SkyConfig, data: Arc<SkyData>) -> Self {
        Self {
            config,
            data: OnceCell::new_with(Some(data)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.data.initialized()
    }

    pub fn limiting_magnitude(&self) -> f64 {
        self.config.limiting_magnitude
    }

    /// Shared reference data, loading it on the first call
    pub async fn get(&self) -> AppResult<Arc<SkyData>> {
        self.data
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    async fn load(&self) -> AppResult<Arc<SkyData>> {
        let started = std::time::Instant::now();
        let path = self.config.catalog_path.clone();

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            match self.config.catalog_url.as_deref() {
                Some(url) => self.download_catalog(url, &path).await?,
                None => {
                    return Err(AppError::catalog(format!(
                        "catalog file {} not found and no catalog_url configured",
                        path.display()
                    )));
                }
            }
        }

        let catalog = tokio::task::spawn_blocking(move || -> AppResult<StarCatalog> {
            let file = std::fs::File::open(&path).map_err(|e| {
                AppError::catalog(format!("failed to open {}: {e}", path.display()))
            })?;
            StarCatalog::from_hipparcos_reader(std::io::BufReader::new(file))
        })
        .await
        .map_err(|e| AppError::catalog(format!("catalog load task failed: {e}")))??;

        let ephemeris = AnalyticEarthEphemeris::for_years(
            self.config.ephemeris_start_year,
            self.config.ephemeris_end_year,
        )?;

        info!(
            stars = catalog.len(),
            duration_ms = started.elapsed().as_millis(),
            "Loaded star catalog and ephemeris"
        );

        Ok(Arc::new(SkyData::new(catalog, Arc::new(ephemeris))))
    }

    async fn download_catalog(&self, url: &str, path: &Path) -> AppResult<()> {
        warn!(
            url = %url,
            path = %path.display(),
            "Star catalog missing locally, downloading (first chart will be slow)"
        );

        let client = reqwest::Client::builder()
            .timeout(self.config.download_timeout)
            .build()?;
        let body = client.get(url).send().await?.error_for_status()?.bytes().await?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::catalog(format!("failed to create {}: {e}", parent.display()))
                })?;
            }
        }

        // Write beside the target and rename so a partial download is never picked up
        let partial = path.with_extension("partial");
        tokio::fs::write(&partial, &body)
            .await
            .map_err(|e| AppError::catalog(format!("failed to write {}: {e}", partial.display())))?;
        tokio::fs::rename(&partial, path)
            .await
            .map_err(|e| AppError::catalog(format!("failed to move catalog into place: {e}")))?;

        info!(bytes = body.len(), path = %path.display(), "Downloaded star catalog");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::catalog::tests::{POLARIS, SIRIUS};

    fn config_for(path: &Path) -> SkyConfig {
        SkyConfig {
            catalog_path: path.to_path_buf(),
            catalog_url: None,
            ..SkyConfig::default()
        }
    }

    #[tokio::test]
    async fn test_loads_catalog_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hip_main.dat");
        std::fs::write(&path, format!("{SIRIUS}\n{POLARIS}\n")).unwrap();

        let provider = SkyDataProvider::new(config_for(&path));
        assert!(!provider.is_loaded());

        let first = provider.get().await.unwrap();
        assert_eq!(first.catalog.len(), 2);
        assert!(provider.is_loaded());

        // Later changes to the file are not observed
        std::fs::write(&path, format!("{SIRIUS}\n")).unwrap();
        let second = provider.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_missing_catalog_without_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SkyDataProvider::new(config_for(&dir.path().join("absent.dat")));

        let result = provider.get().await;
        assert!(matches!(result, Err(AppError::Catalog { .. })));
        assert!(!provider.is_loaded());
    }
}
