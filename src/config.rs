//! Configuration system for goldenhour with validation and location resolution.
//!
//! This module handles the TOML configuration file, validation, default value
//! generation, and turning the configured location into the engine's inputs.
//!
//! ## Configuration Sources
//!
//! 1. **XDG_CONFIG_HOME**/goldenhour/goldenhour.toml (created on first run)
//! 2. An optional `geo.toml` next to it that overrides `latitude`/`longitude`,
//!    so the main file can be shared without revealing where you live
//! 3. Command-line flags, applied last
//!
//! ## Configuration Structure
//!
//! ```toml
//! #[Location]
//! latitude = 40.7128                # Decimal degrees, north positive
//! longitude = -74.0060              # Decimal degrees, east positive
//! # city = "Lisbon"                 # Used when latitude/longitude are absent
//! timezone = "America/New_York"     # IANA zone that defines the civil day
//! coordinate_policy = "reject"      # "reject" or "clamp" out-of-range values
//!
//! #[Lighting thresholds]
//! sunrise_angle = -0.833            # Sun altitude at sunrise/sunset
//! golden_hour_low = -4.0            # Golden hour lower edge, blue hour upper edge
//! golden_hour_high = 6.0            # Golden hour upper edge
//! blue_hour_low = -6.0              # Blue hour lower edge
//!
//! #[Watch mode]
//! update_interval = 1               # Seconds between countdown refreshes
//! lookahead_days = 400              # Days to search when today has no window left
//! ```
//!
//! ## Location Resolution
//!
//! Explicit coordinates win over `city`. When no `timezone` is set it is
//! looked up from the coordinates, and only then falls back to UTC.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::geo::{
    CoordinatePolicy, GeoCoordinate, Thresholds, determine_timezone_from_coordinates,
    find_cities_near_coordinate, find_city, parse_timezone,
};
use crate::logger::Log;

/// Geographic configuration structure for storing coordinates separately.
///
/// This structure represents the optional geo.toml file that can store
/// latitude and longitude separately from the main configuration file.
#[derive(Debug, Deserialize, Clone)]
struct GeoConfig {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Contents of `goldenhour.toml`. Every field is optional; defaults come from
/// `constants.rs`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// City name looked up in the offline city database.
    pub city: Option<String>,
    /// IANA zone name. Detected from the coordinates when absent.
    pub timezone: Option<String>,
    pub coordinate_policy: Option<CoordinatePolicy>,
    pub sunrise_angle: Option<f64>,
    pub golden_hour_low: Option<f64>,
    pub golden_hour_high: Option<f64>,
    pub blue_hour_low: Option<f64>,
    pub update_interval: Option<u64>, // seconds
    pub lookahead_days: Option<u32>,
}

/// Where to compute events for, after every source has been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: GeoCoordinate,
    pub timezone: Tz,
    /// Human-readable name: the city, or formatted coordinates.
    pub label: String,
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub coordinate_policy: Option<CoordinatePolicy>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("goldenhour").join("goldenhour.toml"))
    }

    /// Create a default config file with optional coordinate override.
    ///
    /// # Arguments
    /// * `path` - Path where the config file should be created
    /// * `coords` - Optional tuple of (latitude, longitude, city_name). When
    ///   absent, a New York City placeholder is written.
    ///
    /// If a `geo.toml` already sits next to `path`, the coordinates go there
    /// instead of into the main file.
    pub fn create_default_config(path: &Path, coords: Option<(f64, f64, String)>) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let (lat, lon, city_name) = match coords {
            Some((lat, lon, city)) => (lat, lon, Some(city)),
            None => (DEFAULT_LATITUDE, DEFAULT_LONGITUDE, None),
        };
        let timezone = determine_timezone_from_coordinates(lat, lon);

        if let Some(city) = &city_name {
            Log::log_indented(&format!("Using selected location for new config: {}", city));
        }

        let geo_path = path
            .parent()
            .map(|parent| parent.join("geo.toml"))
            .filter(|geo_path| geo_path.exists());
        let write_coords_to_geo_file = geo_path.is_some();

        if let Some(geo_path) = &geo_path {
            let geo_content = format!(
                "#[Private geo coordinates]\nlatitude = {:.6}\nlongitude = {:.6}\n",
                lat, lon
            );
            fs::write(geo_path, geo_content).with_context(|| {
                format!("Failed to write coordinates to {}", geo_path.display())
            })?;
            Log::log_indented(&format!(
                "Saved coordinates to separate geo file: {}",
                crate::utils::path_for_display(geo_path)
            ));
        }

        let mut builder = ConfigBuilder::new().add_section("Location");
        if !write_coords_to_geo_file {
            builder = builder
                .add_setting(
                    "latitude",
                    &format!("{:.6}", lat),
                    "Latitude in degrees, north positive (-90 to 90)",
                )
                .add_setting(
                    "longitude",
                    &format!("{:.6}", lon),
                    "Longitude in degrees, east positive (-180 to 180)",
                );
        }
        let config_content = builder
            .add_setting(
                "timezone",
                &format!("\"{}\"", timezone.name()),
                "IANA time zone that defines the civil day",
            )
            .add_setting(
                "coordinate_policy",
                &format!("\"{}\"", DEFAULT_COORDINATE_POLICY.as_str()),
                "Out-of-range coordinates: \"reject\" or \"clamp\"",
            )
            .add_section("Lighting thresholds")
            .add_setting(
                "sunrise_angle",
                &format!("{:?}", DEFAULT_SUNRISE_ANGLE),
                "Sun altitude at sunrise and sunset (degrees)",
            )
            .add_setting(
                "golden_hour_low",
                &format!("{:?}", DEFAULT_GOLDEN_HOUR_LOW),
                "Golden hour lower edge, blue hour upper edge",
            )
            .add_setting(
                "golden_hour_high",
                &format!("{:?}", DEFAULT_GOLDEN_HOUR_HIGH),
                "Golden hour upper edge",
            )
            .add_setting(
                "blue_hour_low",
                &format!("{:?}", DEFAULT_BLUE_HOUR_LOW),
                "Blue hour lower edge",
            )
            .add_section("Watch mode")
            .add_setting(
                "update_interval",
                &DEFAULT_UPDATE_INTERVAL.to_string(),
                &format!(
                    "Seconds between countdown refreshes ({}-{})",
                    MINIMUM_UPDATE_INTERVAL, MAXIMUM_UPDATE_INTERVAL
                ),
            )
            .add_setting(
                "lookahead_days",
                &DEFAULT_LOOKAHEAD_DAYS.to_string(),
                &format!(
                    "Days to search for the next window ({}-{})",
                    MINIMUM_LOOKAHEAD_DAYS, MAXIMUM_LOOKAHEAD_DAYS
                ),
            )
            .build();

        fs::write(path, config_content)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;

        Log::log_indented(&format!(
            "Created default config file: {}",
            crate::utils::path_for_display(path)
        ));

        Ok(())
    }

    /// Load from a specific path. Never creates a file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        Self::load_from_path_with_overrides(path, &ConfigOverrides::default())
    }

    /// Load from a specific path with command-line values merged in.
    ///
    /// Validation runs once, after the overrides, so an override (such as a
    /// clamp policy) can fix a value the file alone would fail on.
    pub fn load_from_path_with_overrides(path: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Self::load_geo_override_from_path(&mut config, path);
        config.apply_overrides(overrides);

        validate_config(&config)?;

        Ok(config)
    }

    /// Load geo.toml from next to `config_path`, if present.
    ///
    /// A missing file is normal. An unreadable or malformed one is reported
    /// and the main file's coordinates are kept.
    fn load_geo_override_from_path(config: &mut Config, config_path: &Path) {
        let Some(geo_path) = config_path.parent().map(|parent| parent.join("geo.toml")) else {
            return;
        };

        if !geo_path.exists() {
            return;
        }

        match fs::read_to_string(&geo_path) {
            Ok(content) => match toml::from_str::<GeoConfig>(&content) {
                Ok(geo_config) => {
                    if let Some(lat) = geo_config.latitude {
                        config.latitude = Some(lat);
                    }
                    if let Some(lon) = geo_config.longitude {
                        config.longitude = Some(lon);
                    }
                    Log::log_debug(&format!(
                        "Loaded geographic overrides from {}",
                        crate::utils::path_for_display(&geo_path)
                    ));
                }
                Err(e) => {
                    Log::log_warning(&format!(
                        "Failed to parse geo.toml: {}. Using coordinates from main config.",
                        e
                    ));
                }
            },
            Err(e) => {
                Log::log_warning(&format!(
                    "Failed to read geo.toml: {}. Using coordinates from main config.",
                    e
                ));
            }
        }
    }

    /// Load the default config file, creating it first when missing.
    pub fn load() -> Result<Self> {
        Self::load_with_overrides(&ConfigOverrides::default())
    }

    /// Like [`Config::load`], with command-line values merged in before
    /// validation.
    pub fn load_with_overrides(overrides: &ConfigOverrides) -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Log::log_block_start("No configuration found");
            Self::create_default_config(&config_path, None)
                .context("Failed to create default config during load")?;
        }

        Self::load_from_path_with_overrides(&config_path, overrides).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Merge command-line values over the file's.
    ///
    /// Coordinates and city replace each other: giving one on the command line
    /// clears the other from the file.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if overrides.latitude.is_some() || overrides.longitude.is_some() {
            self.latitude = overrides.latitude.or(self.latitude);
            self.longitude = overrides.longitude.or(self.longitude);
            self.city = None;
        }
        if let Some(city) = &overrides.city {
            self.city = Some(city.clone());
            self.latitude = None;
            self.longitude = None;
        }
        if let Some(tz) = &overrides.timezone {
            self.timezone = Some(tz.clone());
        }
        if let Some(policy) = overrides.coordinate_policy {
            self.coordinate_policy = Some(policy);
        }
    }

    pub fn coordinate_policy(&self) -> CoordinatePolicy {
        self.coordinate_policy.unwrap_or(DEFAULT_COORDINATE_POLICY)
    }

    pub fn update_interval(&self) -> u64 {
        self.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL)
    }

    pub fn lookahead_days(&self) -> u32 {
        self.lookahead_days.unwrap_or(DEFAULT_LOOKAHEAD_DAYS)
    }

    /// The altitude thresholds, with defaults for anything not configured.
    pub fn thresholds(&self) -> Result<Thresholds> {
        let thresholds = Thresholds::new(
            self.sunrise_angle.unwrap_or(DEFAULT_SUNRISE_ANGLE),
            self.golden_hour_low.unwrap_or(DEFAULT_GOLDEN_HOUR_LOW),
            self.golden_hour_high.unwrap_or(DEFAULT_GOLDEN_HOUR_HIGH),
            self.blue_hour_low.unwrap_or(DEFAULT_BLUE_HOUR_LOW),
        )?;
        Ok(thresholds)
    }

    /// Resolve coordinates, zone, and a display label.
    pub fn resolve_location(&self) -> Result<ResolvedLocation> {
        let (coordinate, label) = match (self.latitude, self.longitude, &self.city) {
            (Some(lat), Some(lon), _) => {
                let coordinate = GeoCoordinate::with_policy(lat, lon, self.coordinate_policy())?;
                (coordinate, coordinate_label(coordinate))
            }
            (None, None, Some(city)) => {
                let found = find_city(city)?;
                let coordinate =
                    GeoCoordinate::with_policy(found.latitude, found.longitude, self.coordinate_policy())
                        .with_context(|| format!("City database entry for '{}' is invalid", city))?;
                (coordinate, found.display_name())
            }
            (Some(_), None, _) | (None, Some(_), _) => {
                anyhow::bail!("Both latitude and longitude must be given, not just one")
            }
            (None, None, None) => {
                anyhow::bail!(
                    "No location configured. Set latitude/longitude or city in the config file, \
                     or pass --lat/--lon or --city"
                )
            }
        };

        let timezone = match &self.timezone {
            Some(name) => parse_timezone(name)?,
            None => {
                let detected =
                    determine_timezone_from_coordinates(coordinate.latitude(), coordinate.longitude());
                Log::log_debug(&format!("Detected time zone {} from coordinates", detected));
                detected
            }
        };

        Ok(ResolvedLocation {
            coordinate,
            timezone,
            label,
        })
    }

    pub fn log_config(&self, config_path: Option<&Path>) {
        let config_path = config_path
            .map(Path::to_path_buf)
            .or_else(|| Self::get_config_path().ok())
            .unwrap_or_else(|| PathBuf::from("~/.config/goldenhour/goldenhour.toml"));

        Log::log_block_start(&format!(
            "Loaded configuration from {}",
            crate::utils::path_for_display(&config_path)
        ));

        if let Some(geo_path) = config_path.parent().map(|p| p.join("geo.toml")) {
            if geo_path.exists() {
                Log::log_indented(&format!(
                    "Loaded geo coordinates from {}",
                    crate::utils::path_for_display(&geo_path)
                ));
            }
        }

        match (self.latitude, self.longitude, &self.city) {
            (Some(lat), Some(lon), _) => Log::log_indented(&format!(
                "Location: {}",
                crate::utils::format_coordinates(lat, lon)
            )),
            (_, _, Some(city)) => Log::log_indented(&format!("City: {}", city)),
            _ => Log::log_indented("Location: not configured"),
        }
        Log::log_indented(&format!(
            "Time zone: {}",
            self.timezone.as_deref().unwrap_or("detected from coordinates")
        ));
        Log::log_indented(&format!(
            "Coordinate policy: {}",
            self.coordinate_policy().as_str()
        ));
        Log::log_indented(&format!(
            "Sunrise angle: {}°",
            self.sunrise_angle.unwrap_or(DEFAULT_SUNRISE_ANGLE)
        ));
        Log::log_indented(&format!(
            "Golden hour: {}° to {}°",
            self.golden_hour_low.unwrap_or(DEFAULT_GOLDEN_HOUR_LOW),
            self.golden_hour_high.unwrap_or(DEFAULT_GOLDEN_HOUR_HIGH)
        ));
        Log::log_indented(&format!(
            "Blue hour: {}° to {}°",
            self.blue_hour_low.unwrap_or(DEFAULT_BLUE_HOUR_LOW),
            self.golden_hour_low.unwrap_or(DEFAULT_GOLDEN_HOUR_LOW)
        ));
        Log::log_indented(&format!(
            "Update interval: {} seconds",
            self.update_interval()
        ));
        Log::log_indented(&format!("Lookahead: {} days", self.lookahead_days()));
    }
}

/// Formatted coordinates, followed by the nearest city when one is close.
pub fn coordinate_label(coordinate: GeoCoordinate) -> String {
    let (lat, lon) = (coordinate.latitude(), coordinate.longitude());
    let formatted = crate::utils::format_coordinates(lat, lon);

    let nearby = find_cities_near_coordinate(lat, lon, 1)
        .into_iter()
        .next()
        .filter(|city| city.distance_km(lat, lon) <= NEARBY_CITY_RADIUS_KM);

    match nearby {
        Some(city) => format!("{} (near {})", formatted, city.name),
        None => formatted,
    }
}

/// Configuration validation to catch impossible setups before any computation
pub fn validate_config(config: &Config) -> Result<()> {
    match (config.latitude, config.longitude) {
        (Some(lat), Some(lon)) => {
            GeoCoordinate::with_policy(lat, lon, config.coordinate_policy())
                .context("Invalid coordinates in configuration")?;
        }
        (Some(_), None) => anyhow::bail!("latitude is set but longitude is missing"),
        (None, Some(_)) => anyhow::bail!("longitude is set but latitude is missing"),
        (None, None) => {}
    }

    if let Some(city) = &config.city {
        if city.trim().is_empty() {
            anyhow::bail!("city cannot be empty");
        }
    }

    if let Some(name) = &config.timezone {
        parse_timezone(name).context("Invalid timezone in configuration")?;
    }

    config
        .thresholds()
        .context("Invalid lighting thresholds in configuration")?;

    let update_interval = config.update_interval();
    if !(MINIMUM_UPDATE_INTERVAL..=MAXIMUM_UPDATE_INTERVAL).contains(&update_interval) {
        anyhow::bail!(
            "update_interval ({}) must be between {} and {} seconds",
            update_interval,
            MINIMUM_UPDATE_INTERVAL,
            MAXIMUM_UPDATE_INTERVAL
        );
    }

    let lookahead_days = config.lookahead_days();
    if !(MINIMUM_LOOKAHEAD_DAYS..=MAXIMUM_LOOKAHEAD_DAYS).contains(&lookahead_days) {
        anyhow::bail!(
            "lookahead_days ({}) must be between {} and {}",
            lookahead_days,
            MINIMUM_LOOKAHEAD_DAYS,
            MAXIMUM_LOOKAHEAD_DAYS
        );
    }

    Ok(())
}

/// Builder for creating dynamically-aligned configuration files.
///
/// This builder maintains proper comment alignment by calculating the maximum
/// width of all setting lines and applying consistent padding.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        // Calculate the maximum width of all setting lines for alignment
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1; // +1 for one space between setting and comment

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new()); // Empty line before new section
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}
