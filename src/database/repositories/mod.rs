//! SeaORM repository implementations for the cache and storage tables

pub mod cache_entry;
pub mod starmap;

pub use cache_entry::CacheEntrySeaOrmRepository;
pub use starmap::StarmapSeaOrmRepository;
