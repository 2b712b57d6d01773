//! Sun position calculations.
//!
//! Low-precision solar ephemeris (about one arcminute over several centuries
//! around J2000), good enough for sunrise and twilight timing:
//! - Julian date from a UTC instant
//! - Mean anomaly, equation of center, and ecliptic longitude of the sun
//! - Declination and right ascension
//! - Local sidereal time and hour angle
//! - Conversion to horizontal altitude/azimuth
//!
//! All angles are kept in degrees and only converted to radians at the trig
//! call sites. The altitude returned is geometric: no refraction is applied.
//! The sunrise threshold of -0.833 degrees already accounts for refraction and
//! the solar semi-diameter.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::GeoCoordinate;

const JULIAN_DATE_UNIX_EPOCH: f64 = 2_440_587.5;
const JULIAN_DATE_J2000: f64 = 2_451_545.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

const OBLIQUITY_OF_ECLIPTIC: f64 = 23.4397;
const PERIHELION_LONGITUDE: f64 = 102.9372;

/// Position of the sun as seen from a point on Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunPosition {
    /// Compass bearing in degrees, 0..360, 0 = north, increasing clockwise.
    pub azimuth: f64,
    /// Geometric elevation above the horizon in degrees (negative below).
    pub altitude: f64,
    /// Solar declination in degrees.
    pub declination: f64,
    /// Local hour angle in degrees, -180..180, negative before transit.
    pub hour_angle: f64,
}

/// Calculate the sun's position at `instant` for `coord`.
///
/// At the exact poles the azimuth is degenerate: every direction is south (or
/// north), so the value is finite but carries no meaning.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use goldenhour::geo::{GeoCoordinate, compute_sun_position};
///
/// let nyc = GeoCoordinate::new(40.7128, -74.0060).unwrap();
/// let noon = Utc.with_ymd_and_hms(2024, 6, 21, 16, 57, 0).unwrap();
/// let pos = compute_sun_position(noon, nyc);
/// assert!(pos.altitude > 72.0);
/// ```
pub fn compute_sun_position(instant: DateTime<Utc>, coord: GeoCoordinate) -> SunPosition {
    let days = days_since_j2000(instant);
    let (declination, right_ascension) = equatorial_coordinates(days);

    let sidereal = sidereal_time(days, coord.longitude());
    let hour_angle = normalize_degrees_signed(sidereal - right_ascension);

    let phi = coord.latitude().to_radians();
    let dec = declination.to_radians();
    let h = hour_angle.to_radians();

    let sin_altitude = phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos();
    let altitude = sin_altitude.clamp(-1.0, 1.0).asin().to_degrees();

    // Measured from south towards west, then rotated to a north-based bearing
    let azimuth_from_south = h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos());
    let azimuth = normalize_degrees(azimuth_from_south.to_degrees() + 180.0);

    SunPosition {
        azimuth,
        altitude,
        declination,
        hour_angle,
    }
}

/// Julian date of a UTC instant.
pub fn julian_date(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / MILLIS_PER_DAY + JULIAN_DATE_UNIX_EPOCH
}

fn days_since_j2000(instant: DateTime<Utc>) -> f64 {
    julian_date(instant) - JULIAN_DATE_J2000
}

/// Declination and right ascension of the sun, in degrees.
fn equatorial_coordinates(days: f64) -> (f64, f64) {
    let mean_anomaly = normalize_degrees(357.5291 + 0.985_600_28 * days);
    let m = mean_anomaly.to_radians();
    let center = 1.9148 * m.sin() + 0.0200 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin();
    let ecliptic_longitude =
        normalize_degrees(mean_anomaly + center + PERIHELION_LONGITUDE + 180.0);

    let l = ecliptic_longitude.to_radians();
    let e = OBLIQUITY_OF_ECLIPTIC.to_radians();
    let declination = (e.sin() * l.sin()).asin().to_degrees();
    let right_ascension = normalize_degrees((l.sin() * e.cos()).atan2(l.cos()).to_degrees());

    (declination, right_ascension)
}

/// Local sidereal time in degrees for an east-positive longitude.
fn sidereal_time(days: f64, longitude: f64) -> f64 {
    normalize_degrees(280.16 + 360.985_623_5 * days + longitude)
}

fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

fn normalize_degrees_signed(angle: f64) -> f64 {
    let wrapped = normalize_degrees(angle);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}
