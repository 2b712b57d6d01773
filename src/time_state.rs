//! Time-based window selection for the lighting windows of a day.
//!
//! This module handles the core logic for deciding which golden or blue hour
//! window matters at a given instant. It works on an already computed
//! [`SunEventSet`] and never touches the ephemeris itself.
//!
//! ## Key Functionality
//! - **Window Selection**: The window in progress, else the next one to start
//! - **Tie-breaking**: Golden hour wins over blue hour at shared boundaries
//! - **Progress**: How far through the current window `now` is
//! - **Lookahead**: Walking forward day by day when today has nothing left
//! - **Standardized Messaging**: Consistent announcements for watch mode

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

pub use crate::geo::events::WindowKind;
use crate::geo::{GeoCoordinate, SunEventSet, Thresholds, TimeWindow, compute_sun_events_with};
use crate::logger::Log;

/// Where a window sits relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPhase {
    /// The window starts after `now`; the boundary is its start.
    Upcoming,
    /// `now` is inside the window; the boundary is its end.
    Current,
    /// The window already ended; the boundary is its end.
    Past,
}

/// The chosen window with a countdown to its relevant boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NextWindowResult {
    pub kind: WindowKind,
    pub phase: WindowPhase,
    pub window: TimeWindow,
    pub boundary_time: DateTime<Utc>,
    /// Whole seconds from `now` to `boundary_time`, truncated toward zero.
    pub seconds_until_boundary: i64,
    /// Fraction of the window elapsed, only for [`WindowPhase::Current`].
    pub progress: Option<f32>,
}

/// Outcome of window selection for one civil day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextWindow {
    Selected(NextWindowResult),
    /// Every window of the day has ended (or none occur at all). `last` is
    /// the latest-ending window, so callers can still show what they missed.
    DayExhausted { last: Option<NextWindowResult> },
}

impl NextWindow {
    pub fn selected(&self) -> Option<&NextWindowResult> {
        match self {
            NextWindow::Selected(result) => Some(result),
            NextWindow::DayExhausted { .. } => None,
        }
    }
}

/// A selected window together with the day it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedWindow {
    pub events: SunEventSet,
    pub result: NextWindowResult,
}

impl DatedWindow {
    pub fn date(&self) -> NaiveDate {
        self.events.date
    }
}

/// Tie-break rank: higher wins.
fn priority(kind: WindowKind) -> u8 {
    match kind {
        WindowKind::EveningGolden => 3,
        WindowKind::MorningGolden => 2,
        WindowKind::EveningBlue => 1,
        WindowKind::MorningBlue => 0,
    }
}

/// Select the window that matters at `now`.
///
/// 1. A window containing `now` (both ends inclusive) is current; its
///    boundary is its end.
/// 2. Otherwise the window with the earliest start after `now` is upcoming;
///    its boundary is its start.
/// 3. Otherwise the day is exhausted.
///
/// When two windows qualify equally (a shared boundary instant, or equal
/// starts) the order is evening golden, morning golden, evening blue,
/// morning blue.
pub fn resolve_next_window(events: &SunEventSet, now: DateTime<Utc>) -> NextWindow {
    let present: Vec<(WindowKind, TimeWindow)> = events
        .windows()
        .into_iter()
        .filter_map(|(kind, window)| window.occurs().map(|window| (kind, window)))
        .collect();

    let current = present
        .iter()
        .filter(|(_, window)| window.contains(now))
        .max_by_key(|(kind, _)| priority(*kind));

    if let Some(&(kind, window)) = current {
        return NextWindow::Selected(build_result(kind, window, WindowPhase::Current, now));
    }

    let upcoming = present
        .iter()
        .filter(|(_, window)| window.start > now)
        .min_by(|a, b| {
            a.1.start
                .cmp(&b.1.start)
                .then_with(|| priority(b.0).cmp(&priority(a.0)))
        });

    if let Some(&(kind, window)) = upcoming {
        return NextWindow::Selected(build_result(kind, window, WindowPhase::Upcoming, now));
    }

    let last = present
        .iter()
        .max_by(|a, b| {
            a.1.end
                .cmp(&b.1.end)
                .then_with(|| priority(a.0).cmp(&priority(b.0)))
        })
        .map(|&(kind, window)| build_result(kind, window, WindowPhase::Past, now));

    NextWindow::DayExhausted { last }
}

fn build_result(
    kind: WindowKind,
    window: TimeWindow,
    phase: WindowPhase,
    now: DateTime<Utc>,
) -> NextWindowResult {
    let boundary_time = match phase {
        WindowPhase::Upcoming => window.start,
        WindowPhase::Current | WindowPhase::Past => window.end,
    };
    let progress = (phase == WindowPhase::Current).then(|| calculate_progress(now, window));

    NextWindowResult {
        kind,
        phase,
        window,
        boundary_time,
        seconds_until_boundary: (boundary_time - now).num_seconds(),
        progress,
    }
}

/// Calculate window progress as a value between 0.0 and 1.0.
///
/// Zero-length windows report 1.0.
pub fn calculate_progress(now: DateTime<Utc>, window: TimeWindow) -> f32 {
    let total = window.duration().num_milliseconds();
    if total <= 0 {
        return 1.0;
    }
    let elapsed = (now - window.start).num_milliseconds();
    (elapsed as f64 / total as f64).clamp(0.0, 1.0) as f32
}

/// Find the next window at or after `now`, starting from `start_date` and
/// walking forward one civil day at a time.
///
/// Returns `None` when no day within `max_days` has a current or upcoming
/// window, which only happens in deep polar day or night with a short
/// lookahead.
pub fn next_window_across_days(
    start_date: NaiveDate,
    coord: GeoCoordinate,
    tz: Tz,
    thresholds: Thresholds,
    now: DateTime<Utc>,
    max_days: u32,
) -> Option<DatedWindow> {
    (0..max_days).find_map(|offset| {
        let date = start_date.checked_add_days(Days::new(u64::from(offset)))?;
        let events = compute_sun_events_with(date, coord, tz, thresholds);
        match resolve_next_window(&events, now) {
            NextWindow::Selected(result) => Some(DatedWindow { events, result }),
            NextWindow::DayExhausted { .. } => None,
        }
    })
}

/// Get the standardized message for a selected window.
pub fn get_window_message(result: &NextWindowResult) -> String {
    match result.phase {
        WindowPhase::Current => format!("{} in progress", result.kind.label()),
        WindowPhase::Upcoming => format!("Waiting for {}", result.kind.label().to_lowercase()),
        WindowPhase::Past => format!("{} has ended", result.kind.label()),
    }
}

/// Determine whether watch mode should announce a change.
///
/// Announces on the first selection and whenever the selected window or its
/// phase changes. Countdown ticks alone are not announced.
pub fn should_announce(previous: Option<&NextWindowResult>, current: &NextWindowResult) -> bool {
    match previous {
        None => true,
        Some(previous) => {
            previous.kind != current.kind
                || previous.phase != current.phase
                || previous.window != current.window
        }
    }
}

/// Log the announcement for a selected window.
pub fn log_window_announcement(result: &NextWindowResult) {
    Log::log_block_start(&get_window_message(result));
}
