//! Earth ephemeris models.
//!
//! The position pipeline only needs Earth's position and velocity relative to
//! the solar-system barycentre, in the ICRS-aligned J2000 equatorial frame.

use chrono::{DateTime, Duration, TimeZone, Utc};
use nalgebra::Vector3;

use super::time::{DAYS_PER_JULIAN_CENTURY, J2000_JD, JulianInstant};
use crate::errors::{AppError, AppResult};

/// Mean obliquity of the ecliptic at J2000.0, degrees
const J2000_OBLIQUITY_DEG: f64 = 23.439_291_1;
/// General precession in longitude, degrees per Julian century
const PRECESSION_IN_LONGITUDE_DEG: f64 = 1.396_971;
/// Step used for the central-difference velocity, days
const VELOCITY_STEP_DAYS: f64 = 0.01;

/// Earth's barycentric state at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthState {
    /// Position in astronomical units
    pub position_au: Vector3<f64>,
    /// Velocity in astronomical units per day
    pub velocity_au_per_day: Vector3<f64>,
}

pub trait Ephemeris: Send + Sync {
    /// Inclusive time span the model is valid for
    fn valid_span(&self) -> (DateTime<Utc>, DateTime<Utc>);

    /// Earth state at `instant`; callers check the span first
    fn earth_state(&self, instant: &JulianInstant) -> EarthState;

    /// Fails with `InvalidInstant` when `instant` is outside [`Ephemeris::valid_span`]
    fn check_instant(&self, instant: DateTime<Utc>) -> AppResult<()> {
        let (valid_from, valid_until) = self.valid_span();
        if instant < valid_from || instant > valid_until {
            return Err(AppError::InvalidInstant {
                instant: instant.to_rfc3339(),
                valid_from: valid_from.to_rfc3339(),
                valid_until: valid_until.to_rfc3339(),
            });
        }
        Ok(())
    }
}

/// Low-precision analytic Earth orbit.
///
/// Earth's heliocentric position is the negated geometric position of the Sun
/// from the classical mean-elements solar theory (about 0.01 degrees in
/// longitude over 1900-2100), referred to the J2000 equinox. The Sun's offset
/// from the barycentre is neglected. This is well inside what annual
/// aberration and stellar parallax need for a naked-eye chart.
#[derive(Debug, Clone)]
pub struct AnalyticEarthEphemeris {
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
}

impl AnalyticEarthEphemeris {
    /// Model covering every local time in `start_year..=end_year` under any
    /// UTC offset: the UTC years padded by one day at each end
    pub fn for_years(start_year: i32, end_year: i32) -> AppResult<Self> {
        let padding = Duration::days(1);
        let valid_from = Utc
            .with_ymd_and_hms(start_year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| AppError::configuration(format!("invalid ephemeris start year {start_year}")))?
            - padding;
        let valid_until = Utc
            .with_ymd_and_hms(end_year + 1, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| AppError::configuration(format!("invalid ephemeris end year {end_year}")))?
            + padding;
        Ok(Self {
            valid_from,
            valid_until,
        })
    }

    fn heliocentric_position(jd_tt: f64) -> Vector3<f64> {
        let t = (jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY;

        let mean_longitude = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
        let mean_anomaly = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
        let eccentricity = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t * t;

        let equation_of_centre = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t)
            * mean_anomaly.sin()
            + (0.019_993 - 0.000_101 * t) * (2.0 * mean_anomaly).sin()
            + 0.000_289 * (3.0 * mean_anomaly).sin();

        let true_anomaly = mean_anomaly + equation_of_centre.to_radians();
        let sun_longitude_j2000 =
            (mean_longitude + equation_of_centre - PRECESSION_IN_LONGITUDE_DEG * t).to_radians();
        let distance_au = 1.000_001_018 * (1.0 - eccentricity * eccentricity)
            / (1.0 + eccentricity * true_anomaly.cos());

        // Earth sits opposite the Sun; ecliptic latitude of the Sun is ~0
        let ecliptic = Vector3::new(
            -distance_au * sun_longitude_j2000.cos(),
            -distance_au * sun_longitude_j2000.sin(),
            0.0,
        );

        let obliquity = J2000_OBLIQUITY_DEG.to_radians();
        let (sin_eps, cos_eps) = obliquity.sin_cos();
        Vector3::new(
            ecliptic.x,
            ecliptic.y * cos_eps - ecliptic.z * sin_eps,
            ecliptic.y * sin_eps + ecliptic.z * cos_eps,
        )
    }
}

impl Ephemeris for AnalyticEarthEphemeris {
    fn valid_span(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.valid_from, self.valid_until)
    }

    fn earth_state(&self, instant: &JulianInstant) -> EarthState {
        let position_au = Self::heliocentric_position(instant.jd_tt);
        let ahead = Self::heliocentric_position(instant.jd_tt + VELOCITY_STEP_DAYS);
        let behind = Self::heliocentric_position(instant.jd_tt - VELOCITY_STEP_DAYS);
        EarthState {
            position_au,
            velocity_au_per_day: (ahead - behind) / (2.0 * VELOCITY_STEP_DAYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::local_instant;

    fn ephemeris() -> AnalyticEarthEphemeris {
        AnalyticEarthEphemeris::for_years(1900, 2100).unwrap()
    }

    fn state_at(year: i32, month: u32, day: u32) -> EarthState {
        let instant = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap();
        ephemeris().earth_state(&JulianInstant::from_utc(instant))
    }

    #[test]
    fn test_perihelion_and_aphelion_distances() {
        let january = state_at(2024, 1, 3).position_au.norm();
        let july = state_at(2024, 7, 5).position_au.norm();
        assert!((january - 0.9833).abs() < 0.001, "perihelion distance {january}");
        assert!((july - 1.0167).abs() < 0.001, "aphelion distance {july}");
    }

    #[test]
    fn test_orbital_speed() {
        // ~29.8 km/s
        let speed = state_at(2024, 3, 20).velocity_au_per_day.norm();
        assert!((speed - 0.0172).abs() < 0.0004, "orbital speed {speed}");
    }

    #[test]
    fn test_march_equinox_direction() {
        // Near the March equinox the Sun is at RA 0, so Earth points to RA 180
        let position = state_at(2024, 3, 20).position_au;
        assert!(position.x < -0.99);
        assert!(position.y.abs() < 0.02);
        assert!(position.z.abs() < 0.01);
    }

    #[test]
    fn test_span_is_enforced() {
        let ephemeris = ephemeris();
        let inside = Utc.with_ymd_and_hms(2101, 1, 1, 23, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(1899, 12, 30, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2101, 1, 2, 0, 0, 1).unwrap();

        assert!(ephemeris.check_instant(inside).is_ok());
        assert!(matches!(
            ephemeris.check_instant(before),
            Err(AppError::InvalidInstant { .. })
        ));
        assert!(matches!(
            ephemeris.check_instant(after),
            Err(AppError::InvalidInstant { .. })
        ));
    }

    #[test]
    fn test_local_times_at_both_ends_of_the_year_range_are_covered() {
        let ephemeris = ephemeris();
        let edges = [
            (1900, 1, 1, 0, 0, 14),
            (1900, 1, 1, 3, 0, 5),
            (2100, 12, 31, 20, 0, -12),
            (2100, 12, 31, 23, 59, -12),
        ];
        for (year, month, day, hour, minute, offset) in edges {
            let local = local_instant(year, month, day, hour, minute, offset).unwrap();
            assert!(
                ephemeris.check_instant(local.with_timezone(&Utc)).is_ok(),
                "{local} should be inside the ephemeris span"
            );
        }
    }
}
