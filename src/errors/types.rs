//! Error type definitions for the star chart service
//!
//! Every failure that can reach a caller is expressed as an [`AppError`]
//! variant, so the web layer can tell bad input, missing records and
//! server-side failures apart without inspecting messages.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-range request fields
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Unknown cache entry or permanent record
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Requested instant lies outside the ephemeris validity span
    #[error("Instant {instant} is outside the ephemeris validity span ({valid_from} to {valid_until})")]
    InvalidInstant {
        instant: String,
        valid_from: String,
        valid_until: String,
    },

    /// Unexpected failure while resolving, projecting or rendering a chart
    #[error("Chart generation failed: {message}")]
    GenerationFailure { message: String },

    /// Underlying cache or permanent store failed or is unreachable
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sea_orm::DbErr),

    /// Star catalog could not be loaded, downloaded or parsed
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// Missing or invalid API key
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client errors raised while fetching reference data
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a generation failure
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::GenerationFailure {
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::Unauthorized { .. }
        )
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        Self::generation(format!("image encoding failed: {err}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::generation(format!("generation task aborted: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(AppError::validation("latitude out of range").is_client_error());
        assert!(AppError::not_found("Starmap", "abc").is_client_error());
        assert!(!AppError::generation("boom").is_client_error());
        assert!(
            !AppError::StoreUnavailable(sea_orm::DbErr::Custom("offline".into())).is_client_error()
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("Cache entry", "unknown-id");
        assert_eq!(err.to_string(), "Not found: Cache entry with id unknown-id");
    }
}
