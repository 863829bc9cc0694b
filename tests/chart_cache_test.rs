mod common;

use std::sync::Arc;

use common::{FAKE_PNG, StubGenerator, new_york_request, small_sky_generator, stores};
use starchart::AppError;
use starchart::models::CacheFingerprint;
use starchart::services::ChartCacheService;

#[tokio::test]
async fn test_repeated_request_is_served_from_cache() {
    let stores = stores().await;
    let generator = Arc::new(StubGenerator::default());
    let service = ChartCacheService::new(stores.cache.clone(), generator.clone());

    let first = service.get_or_generate(&new_york_request()).await.unwrap();
    assert!(!first.cache_hit);
    assert_eq!(first.image_data, FAKE_PNG);

    let second = service.get_or_generate(&new_york_request()).await.unwrap();
    assert!(second.cache_hit);
    assert_eq!(second.cache_id, first.cache_id);
    assert_eq!(second.image_data, first.image_data);

    assert_eq!(generator.call_count(), 1);
    assert_eq!(stores.cache.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_requests_within_rounding_share_an_entry() {
    let stores = stores().await;
    let generator = Arc::new(StubGenerator::default());
    let service = ChartCacheService::new(stores.cache.clone(), generator.clone());

    let mut nearby = new_york_request();
    nearby.latitude = 40.712_84;
    nearby.title = Some("Different title".to_string());

    let first = service.get_or_generate(&new_york_request()).await.unwrap();
    let second = service.get_or_generate(&nearby).await.unwrap();
    assert!(second.cache_hit);
    assert_eq!(first.cache_id, second.cache_id);

    let mut next_minute = new_york_request();
    next_minute.minute = 31;
    let third = service.get_or_generate(&next_minute).await.unwrap();
    assert!(!third.cache_hit);
    assert_ne!(third.cache_id, first.cache_id);
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn test_invalid_latitude_creates_no_entry() {
    let stores = stores().await;
    let generator = Arc::new(StubGenerator::default());
    let service = ChartCacheService::new(stores.cache.clone(), generator.clone());

    let mut request = new_york_request();
    request.latitude = 91.0;

    let result = service.get_or_generate(&request).await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
    assert_eq!(generator.call_count(), 0);
    assert_eq!(stores.cache.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_generation_creates_no_entry() {
    let stores = stores().await;
    let service = ChartCacheService::new(stores.cache.clone(), Arc::new(StubGenerator::failing()));

    let result = service.get_or_generate(&new_york_request()).await;
    assert!(matches!(result, Err(AppError::GenerationFailure { .. })));
    assert_eq!(stores.cache.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_new_york_chart_is_rendered_and_cached() {
    let stores = stores().await;
    let service = ChartCacheService::new(stores.cache.clone(), Arc::new(small_sky_generator()));

    let chart = service.get_or_generate(&new_york_request()).await.unwrap();
    assert!(!chart.cache_hit);

    let decoded = image::load_from_memory(&chart.image_data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (230, 250));

    let fingerprint = CacheFingerprint::from(&new_york_request().validate().unwrap());
    let stored = stores
        .cache
        .find_by_fingerprint(&fingerprint)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, chart.cache_id);
    assert_eq!(stored.image_data, chart.image_data);
}

#[tokio::test]
async fn test_edge_years_render_under_extreme_offsets() {
    let stores = stores().await;
    let service = ChartCacheService::new(stores.cache.clone(), Arc::new(small_sky_generator()));

    let mut earliest = new_york_request();
    (earliest.year, earliest.month, earliest.day) = (1900, 1, 1);
    (earliest.hour, earliest.minute, earliest.utc_offset_hours) = (3, 0, 5);

    let mut latest = new_york_request();
    (latest.year, latest.month, latest.day) = (2100, 12, 31);
    (latest.hour, latest.minute, latest.utc_offset_hours) = (20, 0, -12);

    for request in [earliest, latest] {
        let chart = service.get_or_generate(&request).await.unwrap();
        assert!(!chart.cache_hit);
    }
    assert_eq!(stores.cache.count().await.unwrap(), 2);
}
