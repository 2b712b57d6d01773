//! Time zone handling for civil-day boundaries.
//!
//! Events are always grouped by the calendar day as experienced in the
//! location's IANA time zone, never by UTC date and never by the host's local
//! zone. This module parses zone names, maps instants to civil dates, finds
//! the UTC bounds of a civil day across DST changes, and looks up a zone from
//! coordinates for callers that only have a location.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SolarError};

// DST gaps are at most a couple of hours; search a little past that
const MAX_GAP_MINUTES: i64 = 180;

/// Parse an IANA time zone name such as `"America/New_York"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SolarError::UnknownTimeZone(name.to_string()))
}

/// The civil date `instant` falls on in `tz`.
pub fn civil_date_of(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// UTC instants bounding the civil day `date` in `tz`, as a half-open range.
///
/// The day runs from local midnight to the next local midnight, so it lasts
/// 23 or 25 hours on DST change days. Where a DST change skips midnight, the
/// day starts at the first local time that exists.
pub fn civil_day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (start_of_civil_day(date, tz), start_of_civil_day(next, tz))
}

fn start_of_civil_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
        return start.with_timezone(&Utc);
    }

    // Midnight sits in a DST gap: the first valid local minute is the transition
    (1..=MAX_GAP_MINUTES)
        .find_map(|minutes| {
            tz.from_local_datetime(&(midnight + Duration::minutes(minutes)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Determine the timezone for given coordinates using timezone boundary data.
///
/// Uses the tzf-rs crate. Points it cannot resolve (or names chrono-tz does
/// not know) fall back to UTC; the host zone is never consulted.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    use std::sync::OnceLock;
    use tzf_rs::DefaultFinder;

    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs takes (longitude, latitude)
    let tz_name = finder.get_tz_name(longitude, latitude);
    tz_name.parse::<Tz>().unwrap_or(Tz::UTC)
}
