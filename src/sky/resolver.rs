//! Apparent topocentric altitude/azimuth of catalog stars.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use super::catalog::StarCatalog;
use super::ephemeris::Ephemeris;
use super::frames::{
    EARTH_ROTATION_RAD_PER_DAY, Nutation, geodetic_site_position,
    greenwich_apparent_sidereal_time, precession_matrix, rot_z,
};
use super::time::JulianInstant;
use crate::errors::AppResult;

/// Speed of light, AU per day
const SPEED_OF_LIGHT_AU_PER_DAY: f64 = 173.144_632_674_240_3;

/// Observer-local direction of one star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalPosition {
    /// Degrees above the horizon, negative below it
    pub altitude_deg: f64,
    /// Degrees clockwise from north, in [0, 360)
    pub azimuth_deg: f64,
}

/// Resolve every catalog star to its apparent altitude and azimuth for an
/// observer at sea level on the WGS84 ellipsoid.
///
/// The result is in catalog order. Atmospheric refraction is not applied.
pub fn resolve(
    catalog: &StarCatalog,
    ephemeris: &dyn Ephemeris,
    latitude_deg: f64,
    longitude_deg: f64,
    instant_utc: DateTime<Utc>,
) -> AppResult<Vec<HorizontalPosition>> {
    ephemeris.check_instant(instant_utc)?;

    let instant = JulianInstant::from_utc(instant_utc);
    let earth = ephemeris.earth_state(&instant);

    let t = instant.centuries_tt();
    let nutation = Nutation::at(t);
    let celestial_to_date = nutation.matrix() * precession_matrix(t);
    let gast = greenwich_apparent_sidereal_time(&instant, &nutation);
    let date_to_celestial = celestial_to_date.transpose();

    // Site position and rotation velocity, first in the true-of-date frame
    let site_of_date = rot_z(-gast) * geodetic_site_position(latitude_deg, longitude_deg);
    let spin = Vector3::new(0.0, 0.0, EARTH_ROTATION_RAD_PER_DAY);
    let site_velocity_of_date = spin.cross(&site_of_date);

    let observer_position = earth.position_au + date_to_celestial * site_of_date;
    let observer_velocity =
        earth.velocity_au_per_day + date_to_celestial * site_velocity_of_date;
    let beta = observer_velocity / SPEED_OF_LIGHT_AU_PER_DAY;

    let local_sidereal_time = gast + longitude_deg.to_radians();
    let (sin_lat, cos_lat) = latitude_deg.to_radians().sin_cos();
    let years = instant.years_since_hipparcos_epoch();

    let positions = catalog
        .stars()
        .iter()
        .map(|star| {
            let (ra, dec) = star.position_after(years);
            let direction = unit_vector(ra.to_radians(), dec.to_radians());
            let topocentric = (direction * star.distance_au() - observer_position).normalize();

            // First-order aberration
            let apparent =
                (topocentric + beta - topocentric * topocentric.dot(&beta)).normalize();
            let of_date = celestial_to_date * apparent;

            let apparent_ra = of_date.y.atan2(of_date.x);
            let apparent_dec = of_date.z.clamp(-1.0, 1.0).asin();
            let hour_angle = local_sidereal_time - apparent_ra;

            horizontal(hour_angle, apparent_dec, sin_lat, cos_lat)
        })
        .collect();

    Ok(positions)
}

fn unit_vector(ra: f64, dec: f64) -> Vector3<f64> {
    let (sin_dec, cos_dec) = dec.sin_cos();
    Vector3::new(cos_dec * ra.cos(), cos_dec * ra.sin(), sin_dec)
}

fn horizontal(hour_angle: f64, dec: f64, sin_lat: f64, cos_lat: f64) -> HorizontalPosition {
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_ha, cos_ha) = hour_angle.sin_cos();

    let sin_alt = (sin_lat * sin_dec + cos_lat * cos_dec * cos_ha).clamp(-1.0, 1.0);
    let azimuth = (-cos_dec * sin_ha).atan2(sin_dec * cos_lat - cos_dec * sin_lat * cos_ha);

    HorizontalPosition {
        altitude_deg: sin_alt.asin().to_degrees(),
        azimuth_deg: azimuth.to_degrees().rem_euclid(360.0),
    }
}
