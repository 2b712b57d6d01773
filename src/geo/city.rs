//! Offline city lookup for geographic coordinate determination.
//!
//! Uses the `cities` crate for a database of 10,000+ cities worldwide, so a
//! location can be given by name instead of by coordinates.

use anyhow::{Result, bail};

/// Represents a city with its geographic information
#[derive(Debug, Clone, PartialEq)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityInfo {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Great circle distance from this city to a point, in kilometres.
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        great_circle_distance_km(self.latitude, self.longitude, latitude, longitude)
    }
}

/// Find a city by name.
///
/// The query is matched case-insensitively against the city name, or against
/// `"City, Country"` when a comma is present. When several cities share a
/// name the first one in the database wins; add the country to disambiguate.
///
/// # Errors
/// Fails when nothing matches exactly. Up to five partial matches are listed
/// in the error message as suggestions.
pub fn find_city(query: &str) -> Result<CityInfo> {
    let query = query.trim();
    if query.is_empty() {
        bail!("City name cannot be empty");
    }

    let (name, country) = match query.split_once(',') {
        Some((name, country)) => (name.trim().to_lowercase(), Some(country.trim().to_lowercase())),
        None => (query.to_lowercase(), None),
    };

    let all_cities = get_all_cities();

    let exact = all_cities.iter().find(|city| {
        city.name.to_lowercase() == name
            && country
                .as_ref()
                .is_none_or(|country| city.country.to_lowercase() == *country)
    });

    if let Some(city) = exact {
        return Ok(city.clone());
    }

    let suggestions: Vec<String> = all_cities
        .iter()
        .filter(|city| city.name.to_lowercase().contains(&name))
        .take(5)
        .map(CityInfo::display_name)
        .collect();

    if suggestions.is_empty() {
        bail!("No city named '{}' was found", query);
    }
    bail!(
        "No city named '{}' was found. Did you mean: {}?",
        query,
        suggestions.join("; ")
    )
}

/// Get all cities as a simple list
fn get_all_cities() -> Vec<CityInfo> {
    let iter = IntoIterator::into_iter(cities::all());
    iter.filter_map(|city| {
        // Skip cities with empty names
        if city.city.trim().is_empty() {
            return None;
        }

        Some(CityInfo {
            name: city.city.to_string(),
            country: city.country.to_string(),
            latitude: city.latitude,
            longitude: city.longitude,
        })
    })
    .collect()
}

/// Find cities near a given coordinate
///
/// Used to put a city name next to a location given as raw coordinates.
///
/// # Arguments
/// * `target_lat` - Target latitude
/// * `target_lon` - Target longitude
/// * `max_results` - Maximum number of cities to return
///
/// # Returns
/// Vector of closest cities sorted by distance
pub fn find_cities_near_coordinate(
    target_lat: f64,
    target_lon: f64,
    max_results: usize,
) -> Vec<CityInfo> {
    let mut cities_with_distance: Vec<(CityInfo, f64)> = get_all_cities()
        .into_iter()
        .map(|city| {
            let distance =
                great_circle_distance_km(target_lat, target_lon, city.latitude, city.longitude);
            (city, distance)
        })
        .collect();

    // Sort by distance (closest first)
    cities_with_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

    cities_with_distance
        .into_iter()
        .take(max_results)
        .map(|(city, _)| city)
        .collect()
}

/// Haversine distance in kilometres.
fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}
