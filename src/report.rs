//! Output for a computed day: the boxed log report and JSON.
//!
//! Nothing here does astronomy. It formats a [`SunEventSet`], the current
//! [`SunPosition`], and the selected window.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::ResolvedLocation;
use crate::geo::{DayEvent, NoEventReason, SunEventSet, SunPosition, TimeWindow};
use crate::logger::Log;
use crate::time_state::{DatedWindow, NextWindowResult, WindowPhase, get_window_message};
use crate::utils::{format_countdown, format_duration, format_local_time};

/// Everything printed for one run, in serializable form.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub location: &'a str,
    pub generated_at: DateTime<Utc>,
    pub sun_now: SunPosition,
    pub events: &'a SunEventSet,
    pub next_window: Option<NextWindowEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct NextWindowEntry<'a> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub result: &'a NextWindowResult,
}

impl<'a> Report<'a> {
    pub fn new(
        location: &'a ResolvedLocation,
        events: &'a SunEventSet,
        sun_now: SunPosition,
        next: Option<&'a DatedWindow>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            location: &location.label,
            generated_at,
            sun_now,
            events,
            next_window: next.map(|dated| NextWindowEntry {
                date: dated.date(),
                result: &dated.result,
            }),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    /// Print the report through the logger.
    pub fn log(&self) {
        let tz = self.events.timezone;

        Log::log_block_start(&format!(
            "{} on {} ({})",
            self.location,
            self.events.date.format("%A %Y-%m-%d"),
            tz.name()
        ));
        Log::log_field(
            "Sun now",
            &format!(
                "altitude {:.1}°, azimuth {:.1}°",
                self.sun_now.altitude, self.sun_now.azimuth
            ),
        );

        Log::log_block_start("Sun events");
        Log::log_field("Sunrise", &describe_instant(&self.events.sunrise, tz));
        Log::log_field("Solar noon", &format_local_time(self.events.solar_noon, tz));
        Log::log_field("Sunset", &describe_instant(&self.events.sunset, tz));
        if let Some(length) = self.events.day_length() {
            Log::log_field("Day length", &format_duration(length));
        }

        Log::log_block_start("Lighting windows");
        for (kind, window) in self.events.windows() {
            Log::log_field(kind.label(), &describe_window(&window, tz));
        }

        match &self.next_window {
            Some(entry) => {
                Log::log_block_start(&get_window_message(entry.result));
                log_next_window(entry.date, entry.result, tz, self.events.date);
            }
            None => {
                Log::log_block_start("No golden or blue hour found within the lookahead period");
            }
        }
    }
}

/// Log the details of a selected window under its announcement.
///
/// The date is only shown when it differs from `reference_date`.
pub fn log_next_window(
    date: NaiveDate,
    result: &NextWindowResult,
    tz: Tz,
    reference_date: NaiveDate,
) {
    if date != reference_date {
        Log::log_field("Date", &date.format("%A %Y-%m-%d").to_string());
    }
    Log::log_field("Window", &describe_span(&result.window, tz));
    log_countdown(result);
}

/// Log the countdown to the window's boundary, plus progress when current.
pub fn log_countdown(result: &NextWindowResult) {
    let boundary = match result.phase {
        WindowPhase::Upcoming => "Starts in",
        WindowPhase::Current => "Ends in",
        WindowPhase::Past => "Ended",
    };
    Log::log_field(boundary, &format_countdown(result.seconds_until_boundary));
    if let Some(progress) = result.progress {
        Log::log_field("Progress", &format!("{:.0}%", progress * 100.0));
    }
}

fn describe_instant(event: &DayEvent<DateTime<Utc>>, tz: Tz) -> String {
    match event {
        DayEvent::Occurs(instant) => format_local_time(*instant, tz),
        DayEvent::NoEventToday(reason) => describe_reason(*reason).to_string(),
    }
}

fn describe_window(event: &DayEvent<TimeWindow>, tz: Tz) -> String {
    match event {
        DayEvent::Occurs(window) => describe_span(window, tz),
        DayEvent::NoEventToday(reason) => describe_reason(*reason).to_string(),
    }
}

fn describe_span(window: &TimeWindow, tz: Tz) -> String {
    format!(
        "{} - {} ({})",
        window.start.with_timezone(&tz).format("%H:%M"),
        window.end.with_timezone(&tz).format("%H:%M"),
        format_duration(window.duration())
    )
}

pub fn describe_reason(reason: NoEventReason) -> &'static str {
    match reason {
        NoEventReason::SunAlwaysAbove => "none today (sun stays above)",
        NoEventReason::SunAlwaysBelow => "none today (sun stays below)",
        NoEventReason::IncompleteCrossing => "none today (edge not crossed today)",
    }
}
