//! Utility functions shared across the codebase.
//!
//! This module provides formatting helpers for countdowns, coordinates, local
//! times, and paths used by the report and watch output.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::path::Path;

/// Format a countdown in whole seconds as `1h 05m 09s`.
///
/// Leading zero units are dropped. Negative values (a boundary already
/// passed) are formatted by magnitude with an `ago` suffix.
///
/// # Examples
/// ```
/// use goldenhour::utils::format_countdown;
/// assert_eq!(format_countdown(3909), "1h 05m 09s");
/// assert_eq!(format_countdown(59), "59s");
/// assert_eq!(format_countdown(-120), "2m 00s ago");
/// ```
pub fn format_countdown(seconds: i64) -> String {
    let magnitude = seconds.unsigned_abs();
    let hours = magnitude / 3600;
    let minutes = (magnitude % 3600) / 60;
    let secs = magnitude % 60;

    let body = if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    };

    if seconds < 0 {
        format!("{} ago", body)
    } else {
        body
    }
}

/// Format a duration as hours and minutes, e.g. `15h 05m`.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    if minutes >= 60 {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Format coordinates with hemisphere letters.
///
/// # Examples
/// ```
/// use goldenhour::utils::format_coordinates;
/// assert_eq!(format_coordinates(40.7128, -74.006), "40.7128°N, 74.0060°W");
/// ```
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let lat_dir = if latitude >= 0.0 { "N" } else { "S" };
    let lon_dir = if longitude >= 0.0 { "E" } else { "W" };
    format!(
        "{:.4}°{}, {:.4}°{}",
        latitude.abs(),
        lat_dir,
        longitude.abs(),
        lon_dir
    )
}

/// Wall-clock time of `instant` in `tz`, e.g. `20:31:04 EDT`.
pub fn format_local_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M:%S %Z").to_string()
}

/// Shorten paths under the home directory to `~/...` for display.
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_countdown_units() {
        assert_eq!(format_countdown(0), "0s");
        assert_eq!(format_countdown(60), "1m 00s");
        assert_eq!(format_countdown(3600), "1h 00m 00s");
        assert_eq!(format_countdown(26 * 3600 + 61), "26h 01m 01s");
    }

    #[test]
    fn test_format_countdown_negative() {
        assert_eq!(format_countdown(-5), "5s ago");
        assert_eq!(format_countdown(-3661), "1h 01m 01s ago");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(905)), "15h 05m");
        assert_eq!(format_duration(Duration::minutes(42)), "42m");
        assert_eq!(format_duration(Duration::seconds(-30)), "0m");
    }

    #[test]
    fn test_format_coordinates_hemispheres() {
        assert_eq!(format_coordinates(-33.8688, 151.2093), "33.8688°S, 151.2093°E");
        assert_eq!(format_coordinates(0.0, 0.0), "0.0000°N, 0.0000°E");
    }

    #[test]
    fn test_format_local_time_uses_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 22, 0, 31, 0).unwrap();
        assert_eq!(format_local_time(instant, Tz::America__New_York), "20:31:00 EDT");
        assert_eq!(format_local_time(instant, Tz::UTC), "00:31:00 UTC");
    }

    #[test]
    fn test_path_for_display() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config").join("goldenhour").join("goldenhour.toml");
            assert_eq!(path_for_display(&path), "~/.config/goldenhour/goldenhour.toml");
        }
        assert_eq!(path_for_display(Path::new("/etc/goldenhour.toml")), "/etc/goldenhour.toml");
    }
}
