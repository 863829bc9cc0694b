//! Julian date handling for the position pipeline.

use chrono::{DateTime, Utc};

pub const J2000_JD: f64 = 2_451_545.0;
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Hipparcos catalog epoch J1991.25 (TT)
pub const HIPPARCOS_EPOCH_JD: f64 = 2_448_349.0625;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// TT - UTC (32.184 s TT-TAI plus 37 leap seconds), held constant
pub const TT_MINUS_UTC_SECONDS: f64 = 69.184;

/// One instant expressed on the two time scales the pipeline needs.
///
/// UT1 is taken equal to UTC; the sub-second difference is far below the
/// angular resolution of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianInstant {
    pub jd_utc: f64,
    pub jd_tt: f64,
}

impl JulianInstant {
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        let seconds =
            instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
        let jd_utc = UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY;
        Self {
            jd_utc,
            jd_tt: jd_utc + TT_MINUS_UTC_SECONDS / SECONDS_PER_DAY,
        }
    }

    /// Julian centuries of TT since J2000.0
    pub fn centuries_tt(&self) -> f64 {
        (self.jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY
    }

    /// Days of UT since J2000.0
    pub fn days_ut(&self) -> f64 {
        self.jd_utc - J2000_JD
    }

    /// Julian years of TT elapsed since the Hipparcos catalog epoch
    pub fn years_since_hipparcos_epoch(&self) -> f64 {
        (self.jd_tt - HIPPARCOS_EPOCH_JD) / DAYS_PER_JULIAN_YEAR
    }
}
