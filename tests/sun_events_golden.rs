//! Known-answer tests for sun events, plus a cross-check against the
//! `sunrise` crate's independent implementation.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};

use goldenhour::geo::{GeoCoordinate, NoEventReason, compute_sun_events, parse_timezone};

const CROSS_CHECK_TOLERANCE_SECS: i64 = 4 * 60;

fn local_hm(instant: DateTime<Utc>, tz: Tz) -> (u32, u32) {
    let local = instant.with_timezone(&tz);
    (local.hour(), local.minute())
}

fn minutes_apart(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (a - b).num_minutes().abs()
}

#[test]
fn test_new_york_summer_solstice() {
    let tz = parse_timezone("America/New_York").unwrap();
    let coord = GeoCoordinate::new(40.7128, -74.0060).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let events = compute_sun_events(date, coord, tz);

    let sunrise = events.sunrise.occurs().unwrap();
    let sunset = events.sunset.occurs().unwrap();
    let (rise_h, rise_m) = local_hm(sunrise, tz);
    let (set_h, set_m) = local_hm(sunset, tz);

    let rise_minutes = (rise_h * 60 + rise_m) as i64;
    let set_minutes = (set_h * 60 + set_m) as i64;
    assert!((rise_minutes - (5 * 60 + 25)).abs() <= 3, "sunrise {rise_h}:{rise_m:02}");
    assert!((set_minutes - (20 * 60 + 31)).abs() <= 3, "sunset {set_h}:{set_m:02}");

    // Day length is about 15h 05m
    let length = events.day_length().unwrap();
    assert!((length - Duration::minutes(905)).num_minutes().abs() <= 5);
}

#[test]
fn test_equator_equinox() {
    let coord = GeoCoordinate::new(0.0, 0.0).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let events = compute_sun_events(date, coord, Tz::UTC);

    let length = events.day_length().unwrap();
    assert!((length - Duration::hours(12)).num_minutes().abs() <= 10);

    // The sun climbs steeply at the equator, so twilight windows are short
    let blue = events.blue_hour_morning.occurs().unwrap();
    assert!(blue.duration() < Duration::minutes(15));
}

#[test]
fn test_svalbard_midnight_sun() {
    let tz = parse_timezone("Arctic/Longyearbyen").unwrap();
    let coord = GeoCoordinate::new(78.2232, 15.6267).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let events = compute_sun_events(date, coord, tz);

    assert_eq!(events.sunrise.reason(), Some(NoEventReason::SunAlwaysAbove));
    assert_eq!(events.sunset.reason(), Some(NoEventReason::SunAlwaysAbove));
    for (kind, window) in events.windows() {
        assert!(window.is_absent(), "{} should not occur", kind.label());
    }
}

#[test]
fn test_reykjavik_sunset_after_midnight() {
    // On the June solstice the sun sets a few minutes after local midnight,
    // so it belongs to the next civil day, and it never gets low enough for
    // a blue hour
    let tz = parse_timezone("Atlantic/Reykjavik").unwrap();
    let coord = GeoCoordinate::new(64.1466, -21.9426).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let events = compute_sun_events(date, coord, tz);

    assert!(events.sunrise.occurs().is_some());
    assert_eq!(events.sunset.reason(), Some(NoEventReason::IncompleteCrossing));
    assert_eq!(events.blue_hour_morning.reason(), Some(NoEventReason::SunAlwaysAbove));
    assert_eq!(events.blue_hour_evening.reason(), Some(NoEventReason::SunAlwaysAbove));
    assert_eq!(
        events.golden_hour_evening.reason(),
        Some(NoEventReason::IncompleteCrossing)
    );
}

#[test]
fn test_tromso_sun_peaks_inside_golden_band() {
    // Late November the noon sun stays below +6, so neither golden hour can
    // end even though sunrise and sunset happen
    let tz = parse_timezone("Europe/Oslo").unwrap();
    let coord = GeoCoordinate::new(69.6492, 18.9553).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
    let events = compute_sun_events(date, coord, tz);

    let sunrise = events.sunrise.occurs().unwrap();
    let sunset = events.sunset.occurs().unwrap();
    let expected_rise = Utc.with_ymd_and_hms(2024, 11, 20, 8, 59, 0).unwrap();
    let expected_set = Utc.with_ymd_and_hms(2024, 11, 20, 11, 59, 0).unwrap();
    assert!(minutes_apart(sunrise, expected_rise) <= 5, "sunrise {sunrise}");
    assert!(minutes_apart(sunset, expected_set) <= 5, "sunset {sunset}");

    assert_eq!(
        events.golden_hour_morning.reason(),
        Some(NoEventReason::IncompleteCrossing)
    );
    assert_eq!(
        events.golden_hour_evening.reason(),
        Some(NoEventReason::IncompleteCrossing)
    );
    assert!(events.blue_hour_morning.occurs().is_some());
    assert!(events.blue_hour_evening.occurs().is_some());
}

#[test]
fn test_dst_change_day_still_has_events() {
    let tz = parse_timezone("Europe/Berlin").unwrap();
    let coord = GeoCoordinate::new(52.52, 13.405).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let events = compute_sun_events(date, coord, tz);

    for (kind, window) in events.windows() {
        assert!(window.occurs().is_some(), "{} missing", kind.label());
    }
    // Sunrise moves from about 05:55 CET to 06:53 CEST on this date
    let (hour, _) = local_hm(events.sunrise.occurs().unwrap(), tz);
    assert_eq!(hour, 6);
}

#[test]
fn test_cross_check_with_sunrise_crate() {
    let places = [
        (40.7128, -74.0060, "America/New_York"),
        (51.5074, -0.1278, "Europe/London"),
        (48.8566, 2.3522, "Europe/Paris"),
        (35.6762, 139.6503, "Asia/Tokyo"),
        (-33.8688, 151.2093, "Australia/Sydney"),
        (-23.5505, -46.6333, "America/Sao_Paulo"),
    ];
    let dates = [
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
        NaiveDate::from_ymd_opt(2024, 9, 22).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 21).unwrap(),
    ];

    for (lat, lon, zone) in places {
        let tz = parse_timezone(zone).unwrap();
        let coord = GeoCoordinate::new(lat, lon).unwrap();
        let reference_coord = Coordinates::new(lat, lon).unwrap();

        for date in dates {
            let events = compute_sun_events(date, coord, tz);
            let reference = SolarDay::new(reference_coord, date);

            let ours = events.sunrise.occurs().unwrap();
            let theirs = reference.event_time(SolarEvent::Sunrise);
            assert!(
                (ours - theirs).num_seconds().abs() <= CROSS_CHECK_TOLERANCE_SECS,
                "{zone} {date}: sunrise {ours} vs {theirs}"
            );

            let ours = events.sunset.occurs().unwrap();
            let theirs = reference.event_time(SolarEvent::Sunset);
            assert!(
                (ours - theirs).num_seconds().abs() <= CROSS_CHECK_TOLERANCE_SECS,
                "{zone} {date}: sunset {ours} vs {theirs}"
            );

            // Civil dawn and dusk are the outer edges of the blue hours
            let ours = events.blue_hour_morning.occurs().unwrap().start;
            let theirs = reference.event_time(SolarEvent::Dawn(DawnType::Civil));
            assert!(minutes_apart(ours, theirs) <= 4, "{zone} {date}: civil dawn");

            let ours = events.blue_hour_evening.occurs().unwrap().end;
            let theirs = reference.event_time(SolarEvent::Dusk(DawnType::Civil));
            assert!(minutes_apart(ours, theirs) <= 4, "{zone} {date}: civil dusk");
        }
    }
}
