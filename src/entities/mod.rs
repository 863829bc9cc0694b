//! SeaORM entity definitions for the cache and storage tables

pub mod prelude;

pub mod cached_starmaps;
pub mod starmaps;
