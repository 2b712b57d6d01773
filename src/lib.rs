//! # Goldenhour
//!
//! Golden hour and blue hour times for photographers.
//!
//! Given a place on Earth and a civil date in that place's time zone,
//! goldenhour computes sunrise, sunset, solar noon, and the morning and
//! evening golden and blue hour windows, then picks the window that matters
//! right now with a countdown to its next boundary.
//!
//! ## Architecture
//!
//! - **geo**: Coordinates, thresholds, the solar ephemeris, per-day events,
//!   time zone handling, and offline city lookup
//! - **time_state**: Selecting the current or next window and looking ahead
//!   across days
//! - **error**: Errors for invalid coordinates, zones, and thresholds
//! - **config**: Configuration loading, validation, and default generation
//! - **args**: Command-line parsing
//! - **report**: Log and JSON output
//! - **constants**: Application-wide constants and defaults
//! - **logger**: Structured logging with visual formatting
//! - **utils**: Formatting helpers
//!
//! ## Example
//!
//! ```
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use goldenhour::geo::{GeoCoordinate, compute_sun_events, parse_timezone};
//! use goldenhour::time_state::{NextWindow, WindowKind, resolve_next_window};
//!
//! let lisbon = GeoCoordinate::new(38.7223, -9.1393).unwrap();
//! let tz = parse_timezone("Europe/Lisbon").unwrap();
//! let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
//! let events = compute_sun_events(date, lisbon, tz);
//!
//! // Early afternoon: the evening golden hour is next
//! let now = Utc.with_ymd_and_hms(2024, 6, 21, 13, 0, 0).unwrap();
//! match resolve_next_window(&events, now) {
//!     NextWindow::Selected(next) => assert_eq!(next.kind, WindowKind::EveningGolden),
//!     NextWindow::DayExhausted { .. } => unreachable!(),
//! }
//! ```

pub mod args;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod logger;
pub mod report;
pub mod time_state;
pub mod utils;

// Re-export important types for easier access
pub use config::Config;
pub use error::SolarError;
pub use geo::{
    DayEvent, GeoCoordinate, NoEventReason, SunEventSet, SunPosition, Thresholds, TimeWindow,
    compute_sun_events, compute_sun_position,
};
pub use logger::{Log, LogLevel};
pub use time_state::{NextWindow, NextWindowResult, WindowKind, WindowPhase, resolve_next_window};
