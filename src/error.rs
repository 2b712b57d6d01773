//! Error types for the solar time engine.
//!
//! The engine only fails on bad input. Expected outcomes near the poles
//! (an event that does not happen today, a day with every window already past)
//! are modelled in the result types instead.

use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SolarError>;

/// Errors returned by the solar time engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SolarError {
    /// Latitude or longitude is non-finite or outside its valid range.
    InvalidCoordinate {
        /// The latitude that was provided.
        latitude: f64,
        /// The longitude that was provided.
        longitude: f64,
    },
    /// The time zone name is not a known IANA zone.
    UnknownTimeZone(String),
    /// Altitude thresholds are out of range or out of order.
    InvalidThresholds(String),
}

impl fmt::Display for SolarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(
                f,
                "invalid coordinate ({latitude}, {longitude}): latitude must be within -90..=90 \
                 and longitude within -180..=180"
            ),
            Self::UnknownTimeZone(name) => write!(f, "unknown time zone '{name}'"),
            Self::InvalidThresholds(message) => write!(f, "invalid altitude thresholds: {message}"),
        }
    }
}

impl std::error::Error for SolarError {}
