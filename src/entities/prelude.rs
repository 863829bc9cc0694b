pub use super::cached_starmaps::Entity as CachedStarmaps;
pub use super::starmaps::Entity as Starmaps;
