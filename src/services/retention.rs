//! Background removal of expired cache entries

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};

use crate::database::repositories::CacheEntrySeaOrmRepository;
use crate::errors::{AppError, AppResult};

pub struct CacheRetentionSweeper {
    repository: CacheEntrySeaOrmRepository,
    max_age: Duration,
    period: Duration,
}

impl CacheRetentionSweeper {
    pub fn new(repository: CacheEntrySeaOrmRepository, max_age: Duration, period: Duration) -> Self {
        Self {
            repository,
            max_age,
            period,
        }
    }

    /// Delete every entry older than `max_age` as of now
    pub async fn sweep(&self) -> AppResult<u64> {
        self.sweep_at(Utc::now()).await
    }

    /// Delete every entry created strictly before `now - max_age`
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let max_age = chrono::Duration::from_std(self.max_age).map_err(|e| {
            AppError::configuration(format!("cache max age out of range: {e}"))
        })?;
        let cutoff = now - max_age;
        let removed = self.repository.delete_created_before(cutoff).await?;

        if removed > 0 {
            info!(removed, cutoff = %cutoff, "Removed expired cache entries");
        } else {
            trace!(cutoff = %cutoff, "No expired cache entries");
        }
        Ok(removed)
    }

    /// Sweep every period until `token` is cancelled
    pub async fn run(self, token: CancellationToken) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Starting cache retention sweeper with interval: {:?}, max age: {:?}",
            self.period, self.max_age
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Cache retention sweeper stopped");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sweep().await {
                        error!("Cache retention sweep failed: {}", e);
                    }
                }
            }
        }
    }
}
