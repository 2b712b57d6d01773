//! Geographic inputs and solar computations.
//!
//! This module provides:
//! - Validated geographic coordinates and the clamp/reject policy
//! - Altitude thresholds that define the photographic lighting windows
//! - Sun position math ([`solar`])
//! - Per-day event and window computation ([`events`])
//! - Time zone handling for civil-day boundaries ([`timezone`])
//! - Offline city lookup ([`city`])

pub mod city;
pub mod events;
pub mod solar;
pub mod timezone;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BLUE_HOUR_LOW, DEFAULT_GOLDEN_HOUR_HIGH, DEFAULT_GOLDEN_HOUR_LOW,
    DEFAULT_SUNRISE_ANGLE, MAXIMUM_THRESHOLD_ANGLE, MINIMUM_THRESHOLD_ANGLE,
};
use crate::error::{Result, SolarError};

pub use city::{CityInfo, find_cities_near_coordinate, find_city};
pub use events::{
    DayEvent, NoEventReason, SunEventSet, TimeWindow, WindowKind, compute_sun_events,
    compute_sun_events_with,
};
pub use solar::{SunPosition, compute_sun_position};
pub use timezone::{
    civil_date_of, civil_day_bounds, determine_timezone_from_coordinates, parse_timezone,
};

/// How out-of-range coordinates are handled at construction.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatePolicy {
    /// Out-of-range values are an error.
    #[default]
    Reject,
    /// Finite out-of-range values are pulled back into range.
    /// Non-finite values are still rejected.
    Clamp,
}

impl CoordinatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinatePolicy::Reject => "reject",
            CoordinatePolicy::Clamp => "clamp",
        }
    }
}

/// A point on Earth in decimal degrees.
///
/// Latitude is within -90..=90 (north positive), longitude within -180..=180
/// (east positive). Both are always finite; the only way to build one is
/// through the validating constructors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let in_range = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !in_range {
            return Err(SolarError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate, clamping finite out-of-range values into range.
    ///
    /// NaN and infinities cannot be clamped meaningfully and are rejected.
    pub fn clamped(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(SolarError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
        })
    }

    /// Build a coordinate under the given policy.
    pub fn with_policy(latitude: f64, longitude: f64, policy: CoordinatePolicy) -> Result<Self> {
        match policy {
            CoordinatePolicy::Reject => Self::new(latitude, longitude),
            CoordinatePolicy::Clamp => Self::clamped(latitude, longitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Sun altitudes (degrees) that bound each lighting window.
///
/// The blue hour spans `blue_low..golden_low`, the golden hour spans
/// `golden_low..golden_high`, and sunrise/sunset happen at `sunrise`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    sunrise: f64,
    golden_low: f64,
    golden_high: f64,
    blue_low: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sunrise: DEFAULT_SUNRISE_ANGLE,
            golden_low: DEFAULT_GOLDEN_HOUR_LOW,
            golden_high: DEFAULT_GOLDEN_HOUR_HIGH,
            blue_low: DEFAULT_BLUE_HOUR_LOW,
        }
    }
}

impl Thresholds {
    /// Build a custom threshold set.
    ///
    /// Requires `blue_low < golden_low < sunrise < golden_high`, all strictly
    /// between -90 and 90 degrees.
    pub fn new(sunrise: f64, golden_low: f64, golden_high: f64, blue_low: f64) -> Result<Self> {
        let all = [sunrise, golden_low, golden_high, blue_low];
        if all
            .iter()
            .any(|a| !(a.is_finite() && *a > MINIMUM_THRESHOLD_ANGLE && *a < MAXIMUM_THRESHOLD_ANGLE))
        {
            return Err(SolarError::InvalidThresholds(format!(
                "angles must lie strictly between {MINIMUM_THRESHOLD_ANGLE} and {MAXIMUM_THRESHOLD_ANGLE} degrees"
            )));
        }
        if !(blue_low < golden_low && golden_low < sunrise && sunrise < golden_high) {
            return Err(SolarError::InvalidThresholds(format!(
                "expected blue_low ({blue_low}) < golden_low ({golden_low}) < sunrise ({sunrise}) \
                 < golden_high ({golden_high})"
            )));
        }
        Ok(Self {
            sunrise,
            golden_low,
            golden_high,
            blue_low,
        })
    }

    pub fn sunrise(&self) -> f64 {
        self.sunrise
    }

    pub fn golden_low(&self) -> f64 {
        self.golden_low
    }

    pub fn golden_high(&self) -> f64 {
        self.golden_high
    }

    pub fn blue_low(&self) -> f64 {
        self.blue_low
    }

    /// Upper edge of the blue hour, shared with the golden hour's lower edge.
    pub fn blue_high(&self) -> f64 {
        self.golden_low
    }
}
