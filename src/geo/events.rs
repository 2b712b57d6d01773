//! Sunrise, sunset, and lighting windows for one civil day.
//!
//! The sun's altitude is sampled across the civil day (local midnight to the
//! next local midnight, DST-aware) on a fixed grid. Each sign change against a
//! threshold brackets one crossing, which is then refined by bisection.
//!
//! | Event | Threshold | Direction |
//! |---|---|---|
//! | blue hour (morning) | -6 to -4 | rising |
//! | golden hour (morning) | -4 to +6 | rising |
//! | sunrise | -0.833 | rising |
//! | solar noon | hour angle 0 | |
//! | sunset | -0.833 | setting |
//! | golden hour (evening) | +6 to -4 | setting |
//! | blue hour (evening) | -4 to -6 | setting |
//!
//! Morning crossings are searched before solar noon and evening crossings
//! after it. When a crossing does not happen inside the civil day, the event
//! is reported as [`DayEvent::NoEventToday`] with a reason. A window is only
//! present when both of its edges are crossed today.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::solar::compute_sun_position;
use super::timezone::civil_day_bounds;
use super::{GeoCoordinate, Thresholds};
use crate::constants::{BISECTION_RESOLUTION_MS, MAX_BISECTION_STEPS, SCAN_STEP_SECS};

/// Why an event does not happen on the requested civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoEventReason {
    /// The sun stays above the threshold (or band) all day: polar day.
    SunAlwaysAbove,
    /// The sun stays below the threshold (or band) all day: polar night.
    SunAlwaysBelow,
    /// The sun reaches the threshold (or band), but the needed crossings do
    /// not all happen inside this civil day. Either a crossing falls on an
    /// adjacent day, or the sun turns back inside a band without crossing
    /// its far edge.
    IncompleteCrossing,
}

/// An event that either happens on a given civil day or explicitly does not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayEvent<T> {
    Occurs(T),
    NoEventToday(NoEventReason),
}

impl<T: Copy> DayEvent<T> {
    /// The event value, if it happens today.
    pub fn occurs(&self) -> Option<T> {
        match self {
            DayEvent::Occurs(value) => Some(*value),
            DayEvent::NoEventToday(_) => None,
        }
    }

    /// The reason the event is absent, if it is.
    pub fn reason(&self) -> Option<NoEventReason> {
        match self {
            DayEvent::Occurs(_) => None,
            DayEvent::NoEventToday(reason) => Some(*reason),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DayEvent::NoEventToday(_))
    }
}

/// A closed interval of absolute time with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when the windows share more than a single boundary instant.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The four photographic lighting windows of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    MorningGolden,
    EveningGolden,
    MorningBlue,
    EveningBlue,
}

impl WindowKind {
    pub const ALL: [WindowKind; 4] = [
        WindowKind::MorningBlue,
        WindowKind::MorningGolden,
        WindowKind::EveningGolden,
        WindowKind::EveningBlue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WindowKind::MorningGolden => "Morning golden hour",
            WindowKind::EveningGolden => "Evening golden hour",
            WindowKind::MorningBlue => "Morning blue hour",
            WindowKind::EveningBlue => "Evening blue hour",
        }
    }
}

/// Everything computed for one `(date, coordinate, zone)` triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunEventSet {
    pub date: NaiveDate,
    pub coordinate: GeoCoordinate,
    pub timezone: Tz,
    pub thresholds: Thresholds,
    pub sunrise: DayEvent<DateTime<Utc>>,
    pub sunset: DayEvent<DateTime<Utc>>,
    pub solar_noon: DateTime<Utc>,
    pub golden_hour_morning: DayEvent<TimeWindow>,
    pub golden_hour_evening: DayEvent<TimeWindow>,
    pub blue_hour_morning: DayEvent<TimeWindow>,
    pub blue_hour_evening: DayEvent<TimeWindow>,
}

impl SunEventSet {
    pub fn window(&self, kind: WindowKind) -> DayEvent<TimeWindow> {
        match kind {
            WindowKind::MorningGolden => self.golden_hour_morning,
            WindowKind::EveningGolden => self.golden_hour_evening,
            WindowKind::MorningBlue => self.blue_hour_morning,
            WindowKind::EveningBlue => self.blue_hour_evening,
        }
    }

    /// All four windows in chronological order for a normal day.
    pub fn windows(&self) -> [(WindowKind, DayEvent<TimeWindow>); 4] {
        WindowKind::ALL.map(|kind| (kind, self.window(kind)))
    }

    /// Time between sunrise and sunset, when both happen today.
    pub fn day_length(&self) -> Option<Duration> {
        match (self.sunrise.occurs(), self.sunset.occurs()) {
            (Some(rise), Some(set)) => Some(set - rise),
            _ => None,
        }
    }
}

/// Compute the day's events with the default thresholds.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use goldenhour::geo::{GeoCoordinate, compute_sun_events, parse_timezone};
///
/// let nyc = GeoCoordinate::new(40.7128, -74.0060).unwrap();
/// let tz = parse_timezone("America/New_York").unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
///
/// let events = compute_sun_events(date, nyc, tz);
/// assert!(events.sunrise.occurs().is_some());
/// assert!(events.golden_hour_evening.occurs().is_some());
/// ```
pub fn compute_sun_events(date: NaiveDate, coord: GeoCoordinate, tz: Tz) -> SunEventSet {
    compute_sun_events_with(date, coord, tz, Thresholds::default())
}

/// Compute sunrise, sunset, solar noon, and the four lighting windows for the
/// civil day `date` in `tz`.
///
/// Never fails: events that do not happen today are reported as absent.
pub fn compute_sun_events_with(
    date: NaiveDate,
    coord: GeoCoordinate,
    tz: Tz,
    thresholds: Thresholds,
) -> SunEventSet {
    let (day_start, day_end) = civil_day_bounds(date, tz);
    let day = DaySamples::collect(coord, day_start, day_end);
    let solar_noon = day.solar_noon();

    let morning = (day_start, solar_noon);
    let evening = (solar_noon, day_end);

    SunEventSet {
        date,
        coordinate: coord,
        timezone: tz,
        thresholds,
        sunrise: day.single_event(thresholds.sunrise(), Direction::Rising, morning),
        sunset: day.single_event(thresholds.sunrise(), Direction::Setting, evening),
        solar_noon,
        golden_hour_morning: day.window(
            thresholds.golden_low(),
            thresholds.golden_high(),
            Direction::Rising,
            morning,
        ),
        golden_hour_evening: day.window(
            thresholds.golden_low(),
            thresholds.golden_high(),
            Direction::Setting,
            evening,
        ),
        blue_hour_morning: day.window(
            thresholds.blue_low(),
            thresholds.blue_high(),
            Direction::Rising,
            morning,
        ),
        blue_hour_evening: day.window(
            thresholds.blue_low(),
            thresholds.blue_high(),
            Direction::Setting,
            evening,
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Rising,
    Setting,
}

/// One sampled point: instant, altitude, hour angle.
#[derive(Debug, Clone, Copy)]
struct Sample {
    at: DateTime<Utc>,
    altitude: f64,
    hour_angle: f64,
}

struct DaySamples {
    coord: GeoCoordinate,
    samples: Vec<Sample>,
    min_altitude: f64,
    max_altitude: f64,
}

impl DaySamples {
    fn collect(coord: GeoCoordinate, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let step = Duration::seconds(SCAN_STEP_SECS);
        let mut samples = Vec::new();
        let mut at = start;
        while at < end {
            samples.push(Self::sample(coord, at));
            at += step;
        }
        // Close the grid exactly on the day boundary
        samples.push(Self::sample(coord, end));

        let min_altitude = samples.iter().map(|s| s.altitude).fold(f64::INFINITY, f64::min);
        let max_altitude = samples
            .iter()
            .map(|s| s.altitude)
            .fold(f64::NEG_INFINITY, f64::max);

        Self {
            coord,
            samples,
            min_altitude,
            max_altitude,
        }
    }

    fn sample(coord: GeoCoordinate, at: DateTime<Utc>) -> Sample {
        let position = compute_sun_position(at, coord);
        Sample {
            at,
            altitude: position.altitude,
            hour_angle: position.hour_angle,
        }
    }

    /// Upper transit: the hour angle passing zero from negative to positive.
    fn solar_noon(&self) -> DateTime<Utc> {
        let transit = self.samples.windows(2).find(|pair| {
            let (a, b) = (pair[0].hour_angle, pair[1].hour_angle);
            // Excludes the +180 -> -180 wrap at lower transit
            a < 0.0 && b >= 0.0 && b - a < 180.0
        });

        match transit {
            Some(pair) => bisect(pair[0].at, pair[1].at, |t| {
                compute_sun_position(t, self.coord).hour_angle >= 0.0
            }),
            None => self
                .samples
                .iter()
                .max_by(|a, b| a.altitude.total_cmp(&b.altitude))
                .map(|s| s.at)
                .unwrap_or(self.samples[0].at),
        }
    }

    /// First crossing of `threshold` in `direction` strictly after `from` and
    /// no later than `until`.
    fn find_crossing(
        &self,
        threshold: f64,
        direction: Direction,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let past_crossing = |altitude: f64| match direction {
            Direction::Rising => altitude >= threshold,
            Direction::Setting => altitude < threshold,
        };

        self.samples
            .windows(2)
            .filter(|pair| pair[1].at > from && pair[0].at < until)
            .filter(|pair| !past_crossing(pair[0].altitude) && past_crossing(pair[1].altitude))
            .map(|pair| {
                bisect(pair[0].at, pair[1].at, |t| {
                    past_crossing(compute_sun_position(t, self.coord).altitude)
                })
            })
            .find(|crossing| *crossing > from && *crossing <= until)
    }

    fn single_event(
        &self,
        threshold: f64,
        direction: Direction,
        (from, until): (DateTime<Utc>, DateTime<Utc>),
    ) -> DayEvent<DateTime<Utc>> {
        match self.find_crossing(threshold, direction, from, until) {
            Some(at) => DayEvent::Occurs(at),
            None => DayEvent::NoEventToday(self.absence_reason(threshold, threshold)),
        }
    }

    /// A window through the band `lower..upper`, entered at one edge and left
    /// at the other, both inside `from..=until`.
    fn window(
        &self,
        lower: f64,
        upper: f64,
        direction: Direction,
        (from, until): (DateTime<Utc>, DateTime<Utc>),
    ) -> DayEvent<TimeWindow> {
        let (entry, exit) = match direction {
            Direction::Rising => (lower, upper),
            Direction::Setting => (upper, lower),
        };

        let window = self
            .find_crossing(entry, direction, from, until)
            .and_then(|start| {
                self.find_crossing(exit, direction, start, until)
                    .map(|end| TimeWindow { start, end })
            });

        match window {
            Some(window) => DayEvent::Occurs(window),
            None => DayEvent::NoEventToday(self.absence_reason(lower, upper)),
        }
    }

    fn absence_reason(&self, lower: f64, upper: f64) -> NoEventReason {
        if self.max_altitude < lower {
            NoEventReason::SunAlwaysBelow
        } else if self.min_altitude >= upper {
            NoEventReason::SunAlwaysAbove
        } else {
            NoEventReason::IncompleteCrossing
        }
    }
}

/// Narrow `lo..hi` to the instant where `past` flips from false to true.
///
/// `past(lo)` is false and `past(hi)` is true on entry. Stops at sub-second
/// resolution or after [`MAX_BISECTION_STEPS`], whichever comes first.
fn bisect<F>(mut lo: DateTime<Utc>, mut hi: DateTime<Utc>, past: F) -> DateTime<Utc>
where
    F: Fn(DateTime<Utc>) -> bool,
{
    for _ in 0..MAX_BISECTION_STEPS {
        let span = (hi - lo).num_milliseconds();
        if span <= BISECTION_RESOLUTION_MS {
            break;
        }
        let mid = lo + Duration::milliseconds(span / 2);
        if past(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo + Duration::milliseconds((hi - lo).num_milliseconds() / 2)
}
