//! Application constants and default values for goldenhour.
//!
//! This module contains the altitude thresholds that define each lighting
//! window, the search limits of the crossing solver, configuration defaults,
//! and validation limits.

use crate::geo::CoordinatePolicy;

// ═══ Altitude Thresholds ═══
// Geometric sun altitude in degrees. Negative values are below the horizon.

pub const DEFAULT_SUNRISE_ANGLE: f64 = -0.833; // Refraction plus solar semi-diameter
pub const DEFAULT_GOLDEN_HOUR_LOW: f64 = -4.0; // Golden hour lower edge, blue hour upper edge
pub const DEFAULT_GOLDEN_HOUR_HIGH: f64 = 6.0; // Golden hour upper edge
pub const DEFAULT_BLUE_HOUR_LOW: f64 = -6.0; // Civil twilight boundary

// Thresholds must stay strictly inside this range
pub const MINIMUM_THRESHOLD_ANGLE: f64 = -90.0;
pub const MAXIMUM_THRESHOLD_ANGLE: f64 = 90.0;

// ═══ Crossing Search ═══
// The civil day is sampled on a fixed grid, then each bracketed crossing is
// refined by bisection.

pub const SCAN_STEP_SECS: i64 = 300; // 5 minute sampling grid
pub const MAX_BISECTION_STEPS: u32 = 64; // Hard cap per crossing
pub const BISECTION_RESOLUTION_MS: i64 = 500; // Stop once the bracket is this narrow

// ═══ Application Configuration Defaults ═══

pub const DEFAULT_COORDINATE_POLICY: CoordinatePolicy = CoordinatePolicy::Reject;
pub const DEFAULT_UPDATE_INTERVAL: u64 = 1; // seconds between countdown refreshes in watch mode
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 400; // Long enough to cross a polar night

// Placeholder location written into a fresh config (New York City)
pub const DEFAULT_LATITUDE: f64 = 40.7128;
pub const DEFAULT_LONGITUDE: f64 = -74.0060;

// Coordinates only get a "near <city>" label within this distance
pub const NEARBY_CITY_RADIUS_KM: f64 = 50.0;

// ═══ Validation Limits ═══

pub const MINIMUM_UPDATE_INTERVAL: u64 = 1; // seconds
pub const MAXIMUM_UPDATE_INTERVAL: u64 = 60; // seconds
pub const MINIMUM_LOOKAHEAD_DAYS: u32 = 1;
pub const MAXIMUM_LOOKAHEAD_DAYS: u32 = 800;

// ═══ Operational Timing Constants ═══

pub const CHECK_INTERVAL_MS: u64 = 100; // How often the watch loop checks the running flag

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
