//! Reference-frame rotations: precession, nutation, Earth rotation and the
//! WGS84 observer position.

use nalgebra::{Matrix3, Vector3};

use super::time::JulianInstant;

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// WGS84 equatorial radius, metres
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
/// WGS84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
pub const METRES_PER_AU: f64 = 149_597_870_700.0;
/// Earth rotation rate, radians per day of UT
pub const EARTH_ROTATION_RAD_PER_DAY: f64 = 7.292_115_146_706_979e-5 * 86_400.0;

/// Frame rotation about the x axis
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Frame rotation about the y axis
pub fn rot_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Frame rotation about the z axis
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// IAU 1976 precession matrix (Lieske angles) from the J2000 mean equator and
/// equinox to the mean equator and equinox of date. `t` is TT centuries since J2000.
pub fn precession_matrix(t: f64) -> Matrix3<f64> {
    let t2 = t * t;
    let t3 = t2 * t;
    let zeta = (2306.2181 * t + 0.30188 * t2 + 0.017998 * t3) * ARCSEC_TO_RAD;
    let z = (2306.2181 * t + 1.09468 * t2 + 0.018203 * t3) * ARCSEC_TO_RAD;
    let theta = (2004.3109 * t - 0.42665 * t2 - 0.041833 * t3) * ARCSEC_TO_RAD;

    rot_z(-z) * rot_y(theta) * rot_z(-zeta)
}

/// Nutation angles for one instant, radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutation {
    pub longitude: f64,
    pub obliquity: f64,
    pub mean_obliquity: f64,
}

impl Nutation {
    /// Dominant terms of the IAU 1980 series (good to about half an arcsecond)
    pub fn at(t: f64) -> Self {
        let omega = (125.044_52 - 1934.136_261 * t + 0.002_070_8 * t * t + t * t * t / 450_000.0)
            .to_radians();
        let sun = (280.4665 + 36_000.7698 * t).to_radians();
        let moon = (218.3165 + 481_267.8813 * t).to_radians();

        let longitude = -17.20 * omega.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
            + 0.21 * (2.0 * omega).sin();
        let obliquity = 9.20 * omega.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
            - 0.09 * (2.0 * omega).cos();
        let mean_obliquity = 84_381.448 - 46.8150 * t - 0.000_59 * t * t + 0.001_813 * t * t * t;

        Self {
            longitude: longitude * ARCSEC_TO_RAD,
            obliquity: obliquity * ARCSEC_TO_RAD,
            mean_obliquity: mean_obliquity * ARCSEC_TO_RAD,
        }
    }

    pub fn true_obliquity(&self) -> f64 {
        self.mean_obliquity + self.obliquity
    }

    /// Rotation from the mean equator and equinox of date to the true ones
    pub fn matrix(&self) -> Matrix3<f64> {
        rot_x(-self.true_obliquity()) * rot_z(-self.longitude) * rot_x(self.mean_obliquity)
    }

    /// Equation of the equinoxes, radians
    pub fn equation_of_equinoxes(&self) -> f64 {
        self.longitude * self.true_obliquity().cos()
    }
}

/// Greenwich mean sidereal time (IAU 1982), radians in [0, 2π)
pub fn greenwich_mean_sidereal_time(instant: &JulianInstant) -> f64 {
    let t = instant.days_ut() / 36_525.0;
    let degrees = 280.460_618_37 + 360.985_647_366_29 * instant.days_ut() + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    degrees.rem_euclid(360.0).to_radians()
}

/// Greenwich apparent sidereal time, radians in [0, 2π)
pub fn greenwich_apparent_sidereal_time(instant: &JulianInstant, nutation: &Nutation) -> f64 {
    (greenwich_mean_sidereal_time(instant) + nutation.equation_of_equinoxes())
        .rem_euclid(std::f64::consts::TAU)
}

/// Earth-fixed position of a sea-level site on the WGS84 ellipsoid, in AU
pub fn geodetic_site_position(latitude_deg: f64, longitude_deg: f64) -> Vector3<f64> {
    let latitude = latitude_deg.to_radians();
    let longitude = longitude_deg.to_radians();
    let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let prime_vertical = WGS84_SEMI_MAJOR_AXIS_M / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        prime_vertical * cos_lat * longitude.cos(),
        prime_vertical * cos_lat * longitude.sin(),
        prime_vertical * (1.0 - e2) * sin_lat,
    ) / METRES_PER_AU
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_gmst_reference_value() {
        // 1987-04-10 0h UT: GMST = 13h10m46.3668s = 197.693195 degrees
        let instant = JulianInstant::from_utc(Utc.with_ymd_and_hms(1987, 4, 10, 0, 0, 0).unwrap());
        let gmst = greenwich_mean_sidereal_time(&instant).to_degrees();
        assert!((gmst - 197.693_195).abs() < 1e-4, "gmst {gmst}");
    }

    #[test]
    fn test_nutation_reference_value() {
        // 1987-04-10 0h TT: dpsi = -3.788", deps = +9.443"
        let t = (2_446_895.5 - 2_451_545.0) / 36_525.0;
        let nutation = Nutation::at(t);
        let dpsi = nutation.longitude / ARCSEC_TO_RAD;
        let deps = nutation.obliquity / ARCSEC_TO_RAD;
        assert!((dpsi + 3.788).abs() < 0.6, "dpsi {dpsi}");
        assert!((deps - 9.443).abs() < 0.5, "deps {deps}");
    }

    #[test]
    fn test_rotations_are_orthonormal() {
        let matrix = Nutation::at(0.24).matrix() * precession_matrix(0.24);
        let identity = matrix * matrix.transpose();
        assert!((identity - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_precession_moves_equinox() {
        // 25 years of precession shifts RA of the J2000 equinox by ~0.32 degrees
        let equinox = precession_matrix(0.25) * Vector3::new(1.0, 0.0, 0.0);
        let shift = equinox.y.atan2(equinox.x).to_degrees();
        assert!((shift - 0.32).abs() < 0.05, "shift {shift}");
    }

    #[test]
    fn test_geodetic_site_radius() {
        let equator = geodetic_site_position(0.0, 0.0) * METRES_PER_AU;
        let pole = geodetic_site_position(90.0, 0.0) * METRES_PER_AU;
        assert!((equator.norm() - 6_378_137.0).abs() < 1e-3);
        assert!((pole.norm() - 6_356_752.314).abs() < 1.0);
    }
}
