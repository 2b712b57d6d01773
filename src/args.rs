//! Command-line argument parsing and processing.
//!
//! This module turns command-line arguments into a [`CliAction`] for the main
//! application logic. Parsing is done with clap; help and version output go
//! through the logger so they match the rest of the program's output.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::geo::CoordinatePolicy;
use crate::logger::Log;

/// Raw command-line flags.
#[derive(Parser, Debug)]
#[command(
    name = "goldenhour",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Latitude in decimal degrees, north positive
    #[arg(long, allow_negative_numbers = true, requires = "lon", conflicts_with = "city")]
    lat: Option<f64>,

    /// Longitude in decimal degrees, east positive
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    /// City name, optionally "City, Country"
    #[arg(long, short = 'c')]
    city: Option<String>,

    /// IANA time zone, e.g. Europe/Lisbon
    #[arg(long)]
    tz: Option<String>,

    /// Civil date to report on (YYYY-MM-DD), default today
    #[arg(long, conflicts_with = "watch")]
    date: Option<NaiveDate>,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, short = 'j', conflicts_with = "watch")]
    json: bool,

    /// Keep running and count down to the next window
    #[arg(long, short = 'w')]
    watch: bool,

    /// Pull out-of-range coordinates (from flags or the config file) into
    /// range instead of failing
    #[arg(long)]
    clamp: bool,

    #[arg(long, short = 'd')]
    debug: bool,

    #[arg(long, short = 'h')]
    help: bool,

    #[arg(long, short = 'V', visible_short_alias = 'v')]
    version: bool,
}

/// Settings shared by the report and watch actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub debug_enabled: bool,
    pub json: bool,
    pub date: Option<NaiveDate>,
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Print the day's events and the next window once
    Report(RunOptions),
    /// Count down to the next window until interrupted
    Watch(RunOptions),
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit
    ShowHelpDueToError { message: String },
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments, program name first
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString> + Clone,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => {
                return ParsedArgs {
                    action: CliAction::ShowHelpDueToError {
                        message: first_line(&e.to_string()),
                    },
                };
            }
        };

        let action = if cli.help {
            CliAction::ShowHelp
        } else if cli.version {
            CliAction::ShowVersion
        } else {
            let options = RunOptions {
                debug_enabled: cli.debug,
                json: cli.json,
                date: cli.date,
                config_path: cli.config,
                overrides: ConfigOverrides {
                    latitude: cli.lat,
                    longitude: cli.lon,
                    city: cli.city,
                    timezone: cli.tz,
                    coordinate_policy: cli.clamp.then_some(CoordinatePolicy::Clamp),
                },
            };
            if cli.watch {
                CliAction::Watch(options)
            } else {
                CliAction::Report(options)
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    ///
    /// Setting `GOLDENHOUR_DEBUG` in the environment has the same effect as
    /// `--debug`.
    pub fn from_env() -> ParsedArgs {
        let mut parsed = Self::parse(std::env::args_os());
        if std::env::var_os("GOLDENHOUR_DEBUG").is_some() {
            if let CliAction::Report(options) | CliAction::Watch(options) = &mut parsed.action {
                options.debug_enabled = true;
            }
        }
        parsed
    }
}

// clap errors carry a usage block; the help screen already shows that
fn first_line(message: &str) -> String {
    message
        .lines()
        .next()
        .unwrap_or(message)
        .trim_start_matches("error: ")
        .to_string()
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: goldenhour [OPTIONS]");
    Log::log_block_start("Location:");
    Log::log_indented("    --lat <deg> --lon <deg>  Coordinates, overriding the config file");
    Log::log_indented("-c, --city <name>            City name, e.g. \"Lisbon\" or \"Paris, France\"");
    Log::log_indented("    --tz <zone>              IANA time zone, detected when omitted");
    Log::log_indented("    --clamp                  Clamp out-of-range coordinates");
    Log::log_block_start("Output:");
    Log::log_indented("    --date <YYYY-MM-DD>      Report on this civil date instead of today");
    Log::log_indented("-j, --json                   Print the report as JSON");
    Log::log_indented("-w, --watch                  Count down to the next window until stopped");
    Log::log_block_start("General:");
    Log::log_indented("    --config <path>          Use this configuration file");
    Log::log_indented("-d, --debug                  Enable detailed debug output");
    Log::log_indented("-h, --help                   Print help information");
    Log::log_indented("-V, --version                Print version information");
    Log::log_end();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(action: CliAction) -> RunOptions {
        match action {
            CliAction::Report(options) | CliAction::Watch(options) => options,
            other => panic!("expected a run action, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(["goldenhour"]);
        assert_eq!(parsed.action, CliAction::Report(RunOptions::default()));
    }

    #[test]
    fn test_parse_debug_flag() {
        for flag in ["--debug", "-d"] {
            let parsed = ParsedArgs::parse(["goldenhour", flag]);
            assert!(options(parsed.action).debug_enabled);
        }
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(ParsedArgs::parse(["goldenhour", "--help"]).action, CliAction::ShowHelp);
        assert_eq!(ParsedArgs::parse(["goldenhour", "-h"]).action, CliAction::ShowHelp);
        assert_eq!(ParsedArgs::parse(["goldenhour", "--version"]).action, CliAction::ShowVersion);
        assert_eq!(ParsedArgs::parse(["goldenhour", "-V"]).action, CliAction::ShowVersion);
        assert_eq!(ParsedArgs::parse(["goldenhour", "-v"]).action, CliAction::ShowVersion);
    }

    #[test]
    fn test_help_takes_precedence() {
        let parsed = ParsedArgs::parse(["goldenhour", "--debug", "--help"]);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let parsed = ParsedArgs::parse(["goldenhour", "--lat", "-33.8688", "--lon", "151.2093"]);
        let overrides = options(parsed.action).overrides;
        assert_eq!(overrides.latitude, Some(-33.8688));
        assert_eq!(overrides.longitude, Some(151.2093));

        let parsed = ParsedArgs::parse(["goldenhour", "--lat=40.7", "--lon=-74.0"]);
        assert_eq!(options(parsed.action).overrides.longitude, Some(-74.0));
    }

    #[test]
    fn test_parse_report_options() {
        let parsed = ParsedArgs::parse([
            "goldenhour",
            "--city",
            "Lisbon",
            "--tz",
            "Europe/Lisbon",
            "--date",
            "2024-06-21",
            "--json",
            "--config",
            "/tmp/goldenhour.toml",
        ]);
        let options = options(parsed.action);
        assert!(options.json);
        assert_eq!(options.date, NaiveDate::from_ymd_opt(2024, 6, 21));
        assert_eq!(options.overrides.city.as_deref(), Some("Lisbon"));
        assert_eq!(options.overrides.timezone.as_deref(), Some("Europe/Lisbon"));
        assert_eq!(options.config_path, Some(PathBuf::from("/tmp/goldenhour.toml")));
    }

    #[test]
    fn test_parse_clamp_sets_policy_override() {
        let parsed = ParsedArgs::parse(["goldenhour", "--clamp"]);
        assert_eq!(
            options(parsed.action).overrides.coordinate_policy,
            Some(CoordinatePolicy::Clamp)
        );

        let parsed = ParsedArgs::parse(["goldenhour"]);
        assert_eq!(options(parsed.action).overrides.coordinate_policy, None);
    }

    #[test]
    fn test_parse_watch() {
        let parsed = ParsedArgs::parse(["goldenhour", "--watch", "--city", "Oslo"]);
        assert!(matches!(parsed.action, CliAction::Watch(_)));
    }

    #[test]
    fn test_invalid_combinations_show_help() {
        let invalid: [&[&str]; 5] = [
            &["goldenhour", "--lat", "40.0"],
            &["goldenhour", "--lat", "1", "--lon", "2", "--city", "Oslo"],
            &["goldenhour", "--watch", "--json"],
            &["goldenhour", "--date", "21/06/2024"],
            &["goldenhour", "--unknown"],
        ];
        for args in invalid {
            let parsed = ParsedArgs::parse(args.iter().copied());
            assert!(
                matches!(parsed.action, CliAction::ShowHelpDueToError { .. }),
                "{args:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_message_is_single_line() {
        let parsed = ParsedArgs::parse(["goldenhour", "--unknown"]);
        match parsed.action {
            CliAction::ShowHelpDueToError { message } => {
                assert!(!message.contains('\n'));
                assert!(message.contains("--unknown"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }
}
