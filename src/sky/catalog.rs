//! Star catalog loaded from the Hipparcos main catalog (ESA 1997, `hip_main.dat`).

use std::io::BufRead;

use tracing::debug;

use crate::errors::{AppError, AppResult};

const MAS_PER_DEGREE: f64 = 3_600_000.0;
const AU_PER_PARSEC: f64 = 206_264.806_247_096_36;
/// Distance assigned to stars without a usable parallax
const DEFAULT_DISTANCE_AU: f64 = 1.0e9 * AU_PER_PARSEC;

// Field positions in the pipe-delimited hip_main.dat records
const FIELD_HIP: usize = 1;
const FIELD_VMAG: usize = 5;
const FIELD_RA_DEG: usize = 8;
const FIELD_DEC_DEG: usize = 9;
const FIELD_PARALLAX: usize = 11;
const FIELD_PM_RA: usize = 12;
const FIELD_PM_DEC: usize = 13;

/// One catalog star at the Hipparcos epoch J1991.25
#[derive(Debug, Clone, PartialEq)]
pub struct StarRecord {
    pub hip: u32,
    /// ICRS right ascension, degrees
    pub right_ascension: f64,
    /// ICRS declination, degrees
    pub declination: f64,
    /// Johnson V magnitude
    pub magnitude: f64,
    pub parallax_mas: Option<f64>,
    /// Proper motion in RA, mu_alpha * cos(dec)
    pub pm_ra_mas_per_year: f64,
    pub pm_dec_mas_per_year: f64,
}

impl StarRecord {
    /// Linearly propagate the catalog position by `years`, returning (ra, dec) in degrees
    pub fn position_after(&self, years: f64) -> (f64, f64) {
        let declination = self.declination + self.pm_dec_mas_per_year * years / MAS_PER_DEGREE;
        let cos_dec = self.declination.to_radians().cos();
        let right_ascension = if cos_dec.abs() > f64::EPSILON {
            self.right_ascension + self.pm_ra_mas_per_year * years / MAS_PER_DEGREE / cos_dec
        } else {
            self.right_ascension
        };
        (right_ascension, declination)
    }

    /// Distance in AU from the parallax, or a very distant default
    pub fn distance_au(&self) -> f64 {
        match self.parallax_mas {
            Some(parallax) if parallax > 0.0 => 1000.0 / parallax * AU_PER_PARSEC,
            _ => DEFAULT_DISTANCE_AU,
        }
    }
}

/// Immutable, ordered collection of catalog stars
#[derive(Debug, Clone, Default)]
pub struct StarCatalog {
    stars: Vec<StarRecord>,
}

impl StarCatalog {
    pub fn new(stars: Vec<StarRecord>) -> Self {
        Self { stars }
    }

    /// Parse a `hip_main.dat` stream. Records without an astrometric position
    /// or V magnitude are skipped.
    pub fn from_hipparcos_reader<R: BufRead>(reader: R) -> AppResult<Self> {
        let mut stars = Vec::new();
        let mut skipped = 0usize;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                AppError::catalog(format!("failed to read catalog line {}: {e}", index + 1))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_hipparcos_record(&line) {
                Some(star) => stars.push(star),
                None => skipped += 1,
            }
        }

        if stars.is_empty() {
            return Err(AppError::catalog("catalog contains no usable star records"));
        }

        debug!(
            stars = stars.len(),
            skipped = skipped,
            "Parsed Hipparcos catalog"
        );
        Ok(Self { stars })
    }

    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.stars.iter().map(|star| star.magnitude).collect()
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

fn parse_field(fields: &[&str], index: usize) -> Option<f64> {
    fields
        .get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
}

/// Parse one `hip_main.dat` record
pub fn parse_hipparcos_record(line: &str) -> Option<StarRecord> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() <= FIELD_PM_DEC {
        return None;
    }

    let hip = fields[FIELD_HIP].trim().parse::<u32>().ok()?;
    let right_ascension = parse_field(&fields, FIELD_RA_DEG)?;
    let declination = parse_field(&fields, FIELD_DEC_DEG)?;
    let magnitude = parse_field(&fields, FIELD_VMAG)?;

    Some(StarRecord {
        hip,
        right_ascension,
        declination,
        magnitude,
        parallax_mas: parse_field(&fields, FIELD_PARALLAX),
        pm_ra_mas_per_year: parse_field(&fields, FIELD_PM_RA).unwrap_or(0.0),
        pm_dec_mas_per_year: parse_field(&fields, FIELD_PM_DEC).unwrap_or(0.0),
    })
}
