//! Sky geometry: catalog, ephemeris, apparent positions and chart projection.

pub mod catalog;
pub mod ephemeris;
pub mod frames;
pub mod projection;
pub mod provider;
pub mod resolver;
pub mod time;

pub use catalog::{StarCatalog, StarRecord};
pub use ephemeris::{AnalyticEarthEphemeris, EarthState, Ephemeris};
pub use projection::{ProjectedStar, project};
pub use provider::{SkyData, SkyDataProvider};
pub use resolver::{HorizontalPosition, resolve};
