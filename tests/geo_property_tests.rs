use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;

use goldenhour::geo::{
    GeoCoordinate, SunEventSet, civil_day_bounds, compute_sun_events, compute_sun_position,
    determine_timezone_from_coordinates,
};
use goldenhour::time_state::{NextWindow, resolve_next_window};

/// Generate valid latitude values
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Latitudes outside the polar circles, where every day has a sunrise
fn temperate_latitude_strategy() -> impl Strategy<Value = f64> {
    -60.0..=60.0
}

/// Any date in a leap year and the year after
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..731).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(offset))
            .unwrap()
    })
}

fn events_for(lat: f64, lon: f64, date: NaiveDate) -> SunEventSet {
    let coord = GeoCoordinate::new(lat, lon).unwrap();
    let tz = determine_timezone_from_coordinates(lat, lon);
    compute_sun_events(date, coord, tz)
}

#[cfg(test)]
mod sun_position_tests {
    use super::*;

    proptest! {
        /// Altitude and azimuth always stay in their ranges, including at the poles
        #[test]
        fn test_position_ranges(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            secs in 0i64..(4 * 365 * 86_400)
        ) {
            let instant = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs);
            let coord = GeoCoordinate::new(lat, lon).unwrap();
            let pos = compute_sun_position(instant, coord);

            prop_assert!((-90.0..=90.0).contains(&pos.altitude));
            prop_assert!((0.0..360.0).contains(&pos.azimuth));
            prop_assert!((-180.0..=180.0).contains(&pos.hour_angle));
            prop_assert!(pos.declination.abs() < 23.5);
        }

        /// Clamping never produces an out-of-range coordinate
        #[test]
        fn test_clamp_stays_in_range(
            lat in -1000.0f64..1000.0,
            lon in -1000.0f64..1000.0
        ) {
            let coord = GeoCoordinate::clamped(lat, lon).unwrap();
            prop_assert!((-90.0..=90.0).contains(&coord.latitude()));
            prop_assert!((-180.0..=180.0).contains(&coord.longitude()));

            let strict = GeoCoordinate::new(lat, lon);
            let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
            prop_assert_eq!(strict.is_ok(), in_range);
        }
    }
}

#[cfg(test)]
mod sun_event_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Present windows are well formed, inside the civil day, and never overlap
        #[test]
        fn test_windows_well_formed(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy()
        ) {
            let events = events_for(lat, lon, date);
            let (day_start, day_end) = civil_day_bounds(date, events.timezone);

            let present: Vec<_> = events
                .windows()
                .into_iter()
                .filter_map(|(kind, window)| window.occurs().map(|w| (kind, w)))
                .collect();

            for (kind, window) in &present {
                prop_assert!(window.start <= window.end, "{:?} is reversed", kind);
                prop_assert!(day_start <= window.start && window.end <= day_end);
            }
            for (i, (a_kind, a)) in present.iter().enumerate() {
                for (b_kind, b) in present.iter().skip(i + 1) {
                    prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a_kind, b_kind);
                }
            }
        }

        /// Morning windows end before solar noon and evening windows start after it
        #[test]
        fn test_windows_respect_solar_noon(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy()
        ) {
            let events = events_for(lat, lon, date);
            let noon = events.solar_noon;

            for window in [events.golden_hour_morning, events.blue_hour_morning] {
                if let Some(window) = window.occurs() {
                    prop_assert!(window.end <= noon);
                }
            }
            for window in [events.golden_hour_evening, events.blue_hour_evening] {
                if let Some(window) = window.occurs() {
                    prop_assert!(window.start >= noon);
                }
            }
        }

        /// Sunrise and sunset sit strictly inside their golden hours
        #[test]
        fn test_sunrise_inside_golden_hour(
            lat in temperate_latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy()
        ) {
            let events = events_for(lat, lon, date);

            if let (Some(rise), Some(golden)) =
                (events.sunrise.occurs(), events.golden_hour_morning.occurs())
            {
                prop_assert!(golden.start < rise && rise < golden.end);
            }
            if let (Some(set), Some(golden)) =
                (events.sunset.occurs(), events.golden_hour_evening.occurs())
            {
                prop_assert!(golden.start < set && set < golden.end);
            }
        }

        /// The countdown shrinks as time moves forward within the same selection
        #[test]
        fn test_countdown_monotonic(
            lat in temperate_latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy(),
            offset in 0i64..86_000,
            gap in 1i64..3_600
        ) {
            let events = events_for(lat, lon, date);
            let (day_start, _) = civil_day_bounds(date, events.timezone);
            let now1 = day_start + Duration::seconds(offset);
            let now2 = now1 + Duration::seconds(gap);

            if let (NextWindow::Selected(a), NextWindow::Selected(b)) =
                (resolve_next_window(&events, now1), resolve_next_window(&events, now2))
            {
                if a.kind == b.kind && a.phase == b.phase {
                    prop_assert!(b.seconds_until_boundary < a.seconds_until_boundary);
                    prop_assert!(b.seconds_until_boundary >= 0);
                }
            }
        }

        /// Same inputs, same outputs
        #[test]
        fn test_idempotent(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy()
        ) {
            prop_assert_eq!(events_for(lat, lon, date), events_for(lat, lon, date));
        }
    }
}

#[cfg(test)]
mod timezone_detection_tests {
    use super::*;

    proptest! {
        /// Every valid coordinate resolves to some zone without panicking
        #[test]
        fn test_extreme_coordinates(
            lat in prop_oneof![Just(90.0), Just(-90.0), Just(89.9999), Just(-89.9999)],
            lon in prop_oneof![Just(180.0), Just(-180.0), Just(179.9999), Just(-179.9999)]
        ) {
            let _tz: Tz = determine_timezone_from_coordinates(lat, lon);
        }

        /// Known major cities map to their zones
        #[test]
        fn test_major_cities_timezones(city_index in 0..8usize) {
            let cities = [
                (40.7128, -74.0060, "America/New_York"),
                (51.5074, -0.1278, "Europe/London"),
                (35.6762, 139.6503, "Asia/Tokyo"),
                (-33.8688, 151.2093, "Australia/Sydney"),
                (34.0522, -118.2437, "America/Los_Angeles"),
                (48.8566, 2.3522, "Europe/Paris"),
                (28.6139, 77.2090, "Asia/Kolkata"),
                (-23.5505, -46.6333, "America/Sao_Paulo"),
            ];

            let (lat, lon, expected) = cities[city_index];
            let result = determine_timezone_from_coordinates(lat, lon);
            prop_assert_eq!(result, expected.parse::<Tz>().unwrap());
        }
    }
}
