//! Centralized error handling for the star chart service
//!
//! # Error Categories
//!
//! - **Validation**: request fields rejected before any chart work runs
//! - **NotFound**: unknown cache entry or permanent record identifiers
//! - **InvalidInstant / GenerationFailure**: server-side pipeline failures
//! - **StoreUnavailable**: cache or permanent database failures
//!
//! # Usage
//!
//! ```rust
//! use starchart::errors::{AppError, AppResult};
//!
//! fn check_latitude(latitude: f64) -> AppResult<f64> {
//!     if !(-90.0..=90.0).contains(&latitude) {
//!         return Err(AppError::validation("latitude must be within [-90, 90]"));
//!     }
//!     Ok(latitude)
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
