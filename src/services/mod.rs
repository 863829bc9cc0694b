//! Service layer between the HTTP handlers and the repositories

pub mod chart_cache;
pub mod generator;
pub mod retention;
pub mod starmap;

pub use chart_cache::ChartCacheService;
pub use generator::{ChartGenerator, StarChartGenerator};
pub use retention::CacheRetentionSweeper;
pub use starmap::StarmapService;
