#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use starchart::{
    AppError, AppResult,
    config::{Config, DatabaseConfig, PngCompression, RenderConfig, SkyConfig},
    database::{
        Database,
        migrations::{CacheMigrator, StorageMigrator},
        repositories::{CacheEntrySeaOrmRepository, StarmapSeaOrmRepository},
    },
    models::{GenerateStarmapRequest, ObserverContext},
    render::ChartRenderer,
    services::{ChartCacheService, ChartGenerator, StarChartGenerator, StarmapService},
    sky::{AnalyticEarthEphemeris, SkyData, SkyDataProvider, StarCatalog},
    web::AppState,
};

pub const SIRIUS: &str = "H|       32349| |06 45 09.25|-16 42 47.3|-1.44| |H|101.28854105|-16.71314306| | 379.21| -546.01|-1223.08|  0.58|  0.53|  0.61|  0.47|  0.63|";
pub const POLARIS: &str = "H|       11767| |02 31 47.08|+89 15 50.9| 1.97|2|H|037.94614689|+89.26413805| |   7.56|   44.22|  -11.74|  0.39|  0.45|  0.48|  0.47|  0.55|";
pub const VEGA: &str = "H|       91262| |18 36 56.19|+38 46 58.8| 0.03| |H|279.23410832|+38.78299311| | 128.93|  201.02|  287.46|  0.55|  0.54|  0.64|  0.48|  0.64|";

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nstub";

/// Generator double that counts calls and can be told to fail
#[derive(Default)]
pub struct StubGenerator {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl StubGenerator {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChartGenerator for StubGenerator {
    async fn generate(&self, _observer: &ObserverContext, _title: Option<&str>) -> AppResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AppError::generation("stub failure"))
        } else {
            Ok(FAKE_PNG.to_vec())
        }
    }
}

pub async fn memory_database() -> Database {
    Database::new(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
    })
    .await
    .unwrap()
}

pub struct Stores {
    pub cache: CacheEntrySeaOrmRepository,
    pub storage: StarmapSeaOrmRepository,
    pub cache_database: Database,
    pub storage_database: Database,
}

pub async fn stores() -> Stores {
    let cache_database = memory_database().await;
    cache_database.migrate::<CacheMigrator>().await.unwrap();
    let storage_database = memory_database().await;
    storage_database.migrate::<StorageMigrator>().await.unwrap();

    Stores {
        cache: CacheEntrySeaOrmRepository::new(cache_database.connection.clone()),
        storage: StarmapSeaOrmRepository::new(storage_database.connection.clone()),
        cache_database,
        storage_database,
    }
}

/// Real pipeline over a three-star catalog and a small canvas
pub fn small_sky_generator() -> StarChartGenerator {
    let catalog =
        StarCatalog::from_hipparcos_reader(format!("{SIRIUS}\n{POLARIS}\n{VEGA}\n").as_bytes())
            .unwrap();
    let ephemeris = AnalyticEarthEphemeris::for_years(1900, 2100).unwrap();
    let data = Arc::new(SkyData::new(catalog, Arc::new(ephemeris)));
    let provider = SkyDataProvider::preloaded(SkyConfig::default(), data);
    let renderer = ChartRenderer::without_captions(RenderConfig {
        width: 230,
        height: 250,
        compression: PngCompression::Fast,
        ..RenderConfig::default()
    });
    StarChartGenerator::new(Arc::new(provider), Arc::new(renderer))
}

pub fn new_york_request() -> GenerateStarmapRequest {
    GenerateStarmapRequest {
        latitude: 40.7128,
        longitude: -74.0060,
        year: 2024,
        month: 6,
        day: 15,
        hour: 22,
        minute: 30,
        utc_offset_hours: -4,
        title: None,
    }
}

pub fn app_state(stores: &Stores, generator: Arc<dyn ChartGenerator>, config: Config) -> AppState {
    AppState {
        config: Arc::new(config),
        chart_cache: ChartCacheService::new(stores.cache.clone(), generator),
        starmaps: StarmapService::new(stores.cache.clone(), stores.storage.clone()),
        cache_backend: stores.cache_database.database_type,
        storage_backend: stores.storage_database.database_type,
    }
}
