//! Visibility filtering and stereographic projection onto the chart disk.
//!
//! The disk has unit radius: the zenith maps to the centre and the horizon to
//! the rim. Raster `y` grows downwards, so `y = -r cos(az)` puts north at the
//! top of the chart.

use super::resolver::HorizontalPosition;

/// One star placed on the unit chart disk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedStar {
    pub x: f64,
    pub y: f64,
    /// Marker area in points squared
    pub size: f64,
    pub magnitude: f64,
}

/// Distance from the disk centre for a given altitude
pub fn altitude_ring_radius(altitude_deg: f64) -> f64 {
    let altitude = altitude_deg.to_radians();
    altitude.cos() / (1.0 + altitude.sin())
}

/// Disk coordinates of a direction on the sky
pub fn project_point(altitude_deg: f64, azimuth_deg: f64) -> (f64, f64) {
    let r = altitude_ring_radius(altitude_deg);
    let azimuth = azimuth_deg.to_radians();
    (r * azimuth.sin(), -r * azimuth.cos())
}

/// Strictly above the horizon and no fainter than the limit
pub fn is_visible(altitude_deg: f64, magnitude: f64, limiting_magnitude: f64) -> bool {
    altitude_deg > 0.0 && magnitude <= limiting_magnitude
}

/// Marker area for a star; brighter stars get larger markers
pub fn marker_size(magnitude: f64, limiting_magnitude: f64, scale: f64) -> f64 {
    let steps = (limiting_magnitude - magnitude + 1.0).max(0.0);
    steps * steps * scale
}

/// Filter and project stars, keeping catalog order.
///
/// `positions` and `magnitudes` are parallel slices; extra entries in the
/// longer one are ignored.
pub fn project(
    positions: &[HorizontalPosition],
    magnitudes: &[f64],
    limiting_magnitude: f64,
    scale: f64,
) -> Vec<ProjectedStar> {
    positions
        .iter()
        .zip(magnitudes)
        .filter(|(position, magnitude)| {
            is_visible(position.altitude_deg, **magnitude, limiting_magnitude)
        })
        .map(|(position, &magnitude)| {
            let (x, y) = project_point(position.altitude_deg, position.azimuth_deg);
            ProjectedStar {
                x,
                y,
                size: marker_size(magnitude, limiting_magnitude, scale),
                magnitude,
            }
        })
        .collect()
}
