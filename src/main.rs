use anyhow::Result;
use chrono::Utc;
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use goldenhour::args::{CliAction, ParsedArgs, RunOptions, display_help, display_version_info};
use goldenhour::config::{Config, ResolvedLocation};
use goldenhour::constants::*;
use goldenhour::geo::{Thresholds, civil_date_of, compute_sun_events_with, compute_sun_position};
use goldenhour::logger::Log;
use goldenhour::report::{Report, log_countdown, log_next_window};
use goldenhour::time_state::{
    DatedWindow, NextWindowResult, log_window_announcement, next_window_across_days,
    resolve_next_window, should_announce,
};

const CHECK_INTERVAL: Duration = Duration::from_millis(CHECK_INTERVAL_MS);

/// Everything needed to compute events, after config and flags are merged.
struct Settings {
    config: Config,
    location: ResolvedLocation,
    thresholds: Thresholds,
}

fn main() -> Result<()> {
    let parsed = ParsedArgs::from_env();

    match parsed.action {
        CliAction::ShowHelp => display_help(),
        CliAction::ShowVersion => display_version_info(),
        CliAction::ShowHelpDueToError { message } => {
            Log::log_error(&message);
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Report(options) => run_report(&options)?,
        CliAction::Watch(options) => run_watch(&options)?,
    }

    Ok(())
}

/// Load configuration, apply command-line overrides, and resolve the location.
fn load_settings(options: &RunOptions) -> Result<Settings> {
    let config = match &options.config_path {
        Some(path) => Config::load_from_path_with_overrides(path, &options.overrides)?,
        None => Config::load_with_overrides(&options.overrides)?,
    };

    if Log::is_debug() {
        config.log_config(options.config_path.as_deref());
    }

    let location = config.resolve_location()?;
    let thresholds = config.thresholds()?;

    Ok(Settings {
        config,
        location,
        thresholds,
    })
}

/// Print the events for one day and the next window, then exit.
fn run_report(options: &RunOptions) -> Result<()> {
    Log::set_debug(options.debug_enabled);
    if options.json {
        Log::set_enabled(false);
    } else {
        Log::log_version();
    }

    let settings = load_settings(options)?;
    let ResolvedLocation {
        coordinate,
        timezone,
        ..
    } = settings.location;

    let now = Utc::now();
    let today = civil_date_of(now, timezone);
    let date = options.date.unwrap_or(today);

    let events = compute_sun_events_with(date, coordinate, timezone, settings.thresholds);
    let next = next_window_across_days(
        today,
        coordinate,
        timezone,
        settings.thresholds,
        now,
        settings.config.lookahead_days(),
    );
    let sun_now = compute_sun_position(now, coordinate);

    let report = Report::new(&settings.location, &events, sun_now, next.as_ref(), now);

    if options.json {
        println!("{}", report.to_json()?);
    } else {
        report.log();
        Log::log_end();
    }

    Ok(())
}

/// Count down to the next window until SIGINT or SIGTERM.
fn run_watch(options: &RunOptions) -> Result<()> {
    Log::set_debug(options.debug_enabled);
    Log::log_version();

    let settings = load_settings(options)?;
    let ResolvedLocation {
        coordinate,
        timezone,
        ..
    } = settings.location;
    Log::log_block_start(&format!(
        "Watching {} ({})",
        settings.location.label,
        timezone.name()
    ));

    // Set up signal handling
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    thread::spawn(move || {
        for signal in signals.forever() {
            Log::log_pipe();
            Log::log_info(&format!("Shutdown signal received: {:?}", signal));
            r.store(false, Ordering::SeqCst);
        }
    });

    let update_interval = Duration::from_secs(settings.config.update_interval());
    let mut day: Option<DatedWindow> = None;
    let mut previous: Option<NextWindowResult> = None;

    while running.load(Ordering::SeqCst) {
        let now = Utc::now();
        let today = civil_date_of(now, timezone);

        // Reuse the computed day until it runs out or the date rolls over
        let cached = day
            .as_ref()
            .filter(|dated| dated.date() >= today)
            .and_then(|dated| resolve_next_window(&dated.events, now).selected().copied());

        let result = match cached {
            Some(result) => result,
            None => {
                let Some(found) = next_window_across_days(
                    today,
                    coordinate,
                    timezone,
                    settings.thresholds,
                    now,
                    settings.config.lookahead_days(),
                ) else {
                    Log::log_block_start(&format!(
                        "No golden or blue hour within the next {} days",
                        settings.config.lookahead_days()
                    ));
                    break;
                };
                Log::log_debug(&format!("Computed sun events for {}", found.date()));
                let result = found.result;
                day = Some(found);
                result
            }
        };

        if should_announce(previous.as_ref(), &result) {
            log_window_announcement(&result);
            if let Some(dated) = &day {
                log_next_window(dated.date(), &result, timezone, today);
            }
        } else if Log::is_debug() || result.seconds_until_boundary % 60 == 0 {
            log_countdown(&result);
        }
        previous = Some(result);

        // Sleep in smaller intervals to check running status
        let mut slept = Duration::from_secs(0);
        while slept < update_interval && running.load(Ordering::SeqCst) {
            let sleep_chunk = CHECK_INTERVAL.min(update_interval - slept);
            thread::sleep(sleep_chunk);
            slept += sleep_chunk;
        }
    }

    Log::log_block_start("Shutting down goldenhour...");
    Log::log_end();

    Ok(())
}
