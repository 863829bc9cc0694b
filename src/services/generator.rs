//! Chart generation pipeline: resolve, project and render

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::errors::AppResult;
use crate::models::ObserverContext;
use crate::render::{ChartRenderer, DateFields};
use crate::sky::{SkyDataProvider, project, resolve};

/// Produces PNG chart bytes for an observer
#[async_trait]
pub trait ChartGenerator: Send + Sync {
    async fn generate(&self, observer: &ObserverContext, title: Option<&str>) -> AppResult<Vec<u8>>;
}

pub struct StarChartGenerator {
    provider: Arc<SkyDataProvider>,
    renderer: Arc<ChartRenderer>,
}

impl StarChartGenerator {
    pub fn new(provider: Arc<SkyDataProvider>, renderer: Arc<ChartRenderer>) -> Self {
        Self { provider, renderer }
    }
}

#[async_trait]
impl ChartGenerator for StarChartGenerator {
    async fn generate(&self, observer: &ObserverContext, title: Option<&str>) -> AppResult<Vec<u8>> {
        let instant = observer.instant_utc()?;
        let data = self.provider.get().await?;
        data.ephemeris.check_instant(instant)?;

        let renderer = Arc::clone(&self.renderer);
        let limiting_magnitude = self.provider.limiting_magnitude();
        let observer = *observer;
        let title = title.map(str::to_string);

        let started = std::time::Instant::now();
        let image = tokio::task::spawn_blocking(move || {
            let positions = resolve(
                &data.catalog,
                data.ephemeris.as_ref(),
                observer.latitude,
                observer.longitude,
                instant,
            )?;
            let stars = project(
                &positions,
                &data.catalog.magnitudes(),
                limiting_magnitude,
                renderer.config().marker_scale,
            );
            debug!(visible = stars.len(), "Projected visible stars");

            renderer.render(
                &stars,
                title.as_deref(),
                DateFields {
                    year: observer.year,
                    month: observer.month,
                    day: observer.day,
                },
                observer.latitude,
                observer.longitude,
            )
        })
        .await??;

        debug!(
            bytes = image.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered chart"
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PngCompression, RenderConfig, SkyConfig};
    use crate::errors::AppError;
    use crate::models::GenerateStarmapRequest;
    use crate::sky::catalog::tests::{POLARIS, SIRIUS};
    use crate::sky::{AnalyticEarthEphemeris, SkyData, StarCatalog};

    fn generator() -> StarChartGenerator {
        let catalog =
            StarCatalog::from_hipparcos_reader(format!("{SIRIUS}\n{POLARIS}\n").as_bytes())
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

    fn observer(year: i32) -> ObserverContext {
        GenerateStarmapRequest {
            latitude: 40.7128,
            longitude: -74.006,
            year,
            month: 6,
            day: 15,
            hour: 22,
            minute: 30,
            utc_offset_hours: -4,
            title: None,
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_generates_png() {
        let bytes = generator().generate(&observer(2024), None).await.unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[tokio::test]
    async fn test_instant_outside_ephemeris_span_is_rejected() {
        let narrow = {
            let catalog = StarCatalog::from_hipparcos_reader(SIRIUS.as_bytes()).unwrap();
            let ephemeris = AnalyticEarthEphemeris::for_years(2000, 2010).unwrap();
            let data = Arc::new(SkyData::new(catalog, Arc::new(ephemeris)));
            StarChartGenerator::new(
                Arc::new(SkyDataProvider::preloaded(SkyConfig::default(), data)),
                Arc::new(ChartRenderer::without_captions(RenderConfig::default())),
            )
        };
        let result = narrow.generate(&observer(2024), None).await;
        assert!(matches!(result, Err(AppError::InvalidInstant { .. })));
    }
}
