//! Chart requests, cache fingerprints and stored chart records.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;
pub const MIN_UTC_OFFSET_HOURS: i32 = -12;
pub const MAX_UTC_OFFSET_HOURS: i32 = 14;
pub const MAX_TITLE_LENGTH: usize = 255;
pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Body of a chart generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateStarmapRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    #[serde(alias = "timezone_offset")]
    pub utc_offset_hours: i32,
    #[serde(default)]
    pub title: Option<String>,
}

impl GenerateStarmapRequest {
    /// Range-check every field and build the observer context
    pub fn validate(&self) -> AppResult<ObserverContext> {
        check_range("latitude", self.latitude, -90.0, 90.0)?;
        check_range("longitude", self.longitude, -180.0, 180.0)?;
        check_range("year", self.year, MIN_YEAR, MAX_YEAR)?;
        check_range("month", self.month, 1, 12)?;
        check_range("day", self.day, 1, 31)?;
        check_range("hour", self.hour, 0, 23)?;
        check_range("minute", self.minute, 0, 59)?;
        check_range(
            "utc_offset_hours",
            self.utc_offset_hours,
            MIN_UTC_OFFSET_HOURS,
            MAX_UTC_OFFSET_HOURS,
        )?;
        validate_title(self.title.as_deref())?;

        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return Err(AppError::validation(format!(
                "{:04}-{:02}-{:02} is not a valid calendar date",
                self.year, self.month, self.day
            )));
        }

        Ok(ObserverContext {
            latitude: self.latitude,
            longitude: self.longitude,
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            utc_offset_hours: self.utc_offset_hours,
        })
    }
}

fn check_range<T>(field: &str, value: T, min: T, max: T) -> AppResult<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    // NaN fails both comparisons, so test for membership rather than exclusion
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )))
    }
}

pub fn validate_title(title: Option<&str>) -> AppResult<()> {
    match title {
        Some(title) if title.chars().count() > MAX_TITLE_LENGTH => Err(AppError::validation(
            format!("title must be at most {MAX_TITLE_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}

/// Observer location and local wall-clock time of a chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverContext {
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub utc_offset_hours: i32,
}

impl ObserverContext {
    /// Local time with its fixed UTC offset
    pub fn observed_at(&self) -> AppResult<DateTime<FixedOffset>> {
        local_instant(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.utc_offset_hours,
        )
    }

    pub fn instant_utc(&self) -> AppResult<DateTime<Utc>> {
        Ok(self.observed_at()?.with_timezone(&Utc))
    }
}

/// Build a timezone-aware instant from wall-clock fields and a whole-hour offset
pub fn local_instant(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    utc_offset_hours: i32,
) -> AppResult<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
        AppError::validation(format!("invalid UTC offset {utc_offset_hours} hours"))
    })?;
    offset
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_else(|| {
            AppError::validation(format!(
                "invalid local time {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}"
            ))
        })
}

/// Round a coordinate to the cache granularity of four decimal places
pub fn round_coordinate(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}

/// Normalized cache key; identical fingerprints are served the identical image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheFingerprint {
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub utc_offset_hours: i32,
}

impl CacheFingerprint {
    /// Observer context the cached image is rendered for
    pub fn observer(&self) -> ObserverContext {
        ObserverContext {
            latitude: self.latitude,
            longitude: self.longitude,
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            utc_offset_hours: self.utc_offset_hours,
        }
    }
}

impl From<&ObserverContext> for CacheFingerprint {
    fn from(observer: &ObserverContext) -> Self {
        Self {
            latitude: round_coordinate(observer.latitude),
            longitude: round_coordinate(observer.longitude),
            year: observer.year,
            month: observer.month,
            day: observer.day,
            hour: observer.hour,
            minute: observer.minute,
            utc_offset_hours: observer.utc_offset_hours,
        }
    }
}

/// A rendered chart held in the cache store
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub id: String,
    pub fingerprint: CacheFingerprint,
    pub image_data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Result of a cache lookup-or-generate
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedChart {
    pub image_data: Vec<u8>,
    pub cache_id: String,
    pub cache_hit: bool,
}

/// A chart promoted to permanent storage
#[derive(Debug, Clone, PartialEq)]
pub struct Starmap {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub observed_at: DateTime<FixedOffset>,
    pub utc_offset_hours: i32,
    pub title: Option<String>,
    pub image_data: Vec<u8>,
    pub extra_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a permanent record created by promotion
#[derive(Debug, Clone)]
pub struct NewStarmap {
    pub latitude: f64,
    pub longitude: f64,
    pub observed_at: DateTime<FixedOffset>,
    pub utc_offset_hours: i32,
    pub title: Option<String>,
    pub image_data: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveStarmapRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStarmapRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extra_data: Option<serde_json::Value>,
}

impl UpdateStarmapRequest {
    pub fn validate(&self) -> AppResult<()> {
        validate_title(self.title.as_deref())
    }
}

/// Public view of a permanent record (the image is served separately)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarmapResponse {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub observed_at: DateTime<FixedOffset>,
    pub utc_offset_hours: i32,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Starmap> for StarmapResponse {
    fn from(starmap: &Starmap) -> Self {
        Self {
            id: starmap.id,
            latitude: starmap.latitude,
            longitude: starmap.longitude,
            observed_at: starmap.observed_at,
            utc_offset_hours: starmap.utc_offset_hours,
            title: starmap.title.clone(),
            extra_data: starmap.extra_data.clone(),
            created_at: starmap.created_at,
            updated_at: starmap.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StarmapListQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl StarmapListQuery {
    /// Resolved (skip, limit) with defaults applied
    pub fn validate(&self) -> AppResult<(u64, u64)> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        check_range("limit", limit, 1, MAX_PAGE_LIMIT)?;
        Ok((self.skip.unwrap_or(0), limit))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarmapListResponse {
    pub items: Vec<StarmapResponse>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}
