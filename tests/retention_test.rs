mod common;

use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;

use common::stores;
use starchart::models::{CacheFingerprint, NewStarmap, local_instant};
use starchart::services::CacheRetentionSweeper;

fn fingerprint() -> CacheFingerprint {
    CacheFingerprint {
        latitude: 48.8566,
        longitude: 2.3522,
        year: 2023,
        month: 8,
        day: 12,
        hour: 23,
        minute: 0,
        utc_offset_hours: 2,
    }
}

#[tokio::test]
async fn test_sweep_removes_only_expired_entries() {
    let stores = stores().await;
    let now = Utc::now();

    let expired = stores
        .cache
        .create(&fingerprint(), vec![1], now - ChronoDuration::hours(25))
        .await
        .unwrap();
    let fresh = stores
        .cache
        .create(&fingerprint(), vec![2], now - ChronoDuration::hours(1))
        .await
        .unwrap();

    let sweeper = CacheRetentionSweeper::new(
        stores.cache.clone(),
        Duration::from_secs(24 * 3600),
        Duration::from_secs(3600),
    );
    assert_eq!(sweeper.sweep_at(now).await.unwrap(), 1);

    assert!(stores.cache.find_by_id(&expired.id).await.unwrap().is_none());
    assert!(stores.cache.find_by_id(&fresh.id).await.unwrap().is_some());

    // Nothing left to remove
    assert_eq!(sweeper.sweep_at(now).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sweep_never_touches_permanent_records() {
    let stores = stores().await;
    let stored = stores
        .storage
        .create(NewStarmap {
            latitude: 48.8566,
            longitude: 2.3522,
            observed_at: local_instant(2023, 8, 12, 23, 0, 2).unwrap(),
            utc_offset_hours: 2,
            title: None,
            image_data: vec![7],
        })
        .await
        .unwrap();

    let sweeper = CacheRetentionSweeper::new(
        stores.cache.clone(),
        Duration::from_secs(1),
        Duration::from_secs(3600),
    );
    sweeper
        .sweep_at(Utc::now() + ChronoDuration::days(365))
        .await
        .unwrap();

    assert!(stores.storage.find_by_id(stored.id).await.unwrap().is_some());
}
