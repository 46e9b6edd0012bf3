//! Ground station location and its display timezone.

use chrono_tz::Tz;

use crate::config::{LocationConfig, LocationSource, TimezoneConfig, TimezoneSource};
use crate::prompt::Prompter;
use crate::Error;

/// Minimum number of digits accepted in a coordinate string.
pub const MIN_COORDINATE_DIGITS: usize = 3;

/// Maximum number of digits accepted in a coordinate string.
pub const MAX_COORDINATE_DIGITS: usize = 9;

/// Station location as sent to the prediction API.
///
/// Coordinates are kept as the strings the user (or config) provided; they
/// go into the request URL verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: String,
    /// Longitude in decimal degrees
    pub longitude: String,
    /// Altitude in feet
    pub altitude: String,
    /// Zone used to display pass times
    pub timezone: Tz,
}

impl Location {
    /// Build a location from raw parts.
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        altitude: impl Into<String>,
        timezone: Tz,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            altitude: altitude.into(),
            timezone,
        }
    }

    /// Coordinates as numbers, if both parse.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.trim().parse().ok()?;
        let lon = self.longitude.trim().parse().ok()?;
        Some((lat, lon))
    }
}

/// Crude coordinate check: the string must hold 3 to 9 digits.
///
/// This is not a range check; `"999.999"` passes.
///
/// ```
/// use inky_amsat::location::is_valid_coordinate;
///
/// assert!(is_valid_coordinate("29.27371"));
/// assert!(is_valid_coordinate("-95.35739"));
/// assert!(!is_valid_coordinate("1.2"));
/// ```
pub fn is_valid_coordinate(input: &str) -> bool {
    let digits = input.chars().filter(char::is_ascii_digit).count();
    (MIN_COORDINATE_DIGITS..=MAX_COORDINATE_DIGITS).contains(&digits)
}

/// Resolve the station location per configuration.
pub fn resolve_location<P: Prompter>(
    location: &LocationConfig,
    timezone: &TimezoneConfig,
    prompter: &mut P,
) -> Result<Location, Error> {
    let (latitude, longitude, altitude) = match location.source {
        LocationSource::Fixed => (
            location.latitude.clone(),
            location.longitude.clone(),
            location.altitude.clone(),
        ),
        LocationSource::Interactive => {
            let latitude = prompter.ask_until(
                "latitude",
                "Please enter your latitude: ",
                "That's not a valid latitude. Please try again.",
                is_valid_coordinate,
            )?;
            let longitude = prompter.ask_until(
                "longitude",
                "Please enter your longitude: ",
                "That's not a valid longitude. Please try again.",
                is_valid_coordinate,
            )?;
            let altitude = prompter.ask("Please enter your altitude in feet: ")?;
            (latitude, longitude, altitude)
        }
    };

    let fallback = parse_zone(&timezone.zone)?;
    let tz = match timezone.source {
        TimezoneSource::Fixed => fallback,
        TimezoneSource::Lookup => lookup_zone(&latitude, &longitude).unwrap_or_else(|| {
            tracing::warn!("Timezone lookup unavailable, using {}", fallback.name());
            fallback
        }),
    };

    tracing::info!(
        "Station at lat={} lon={} alt={} ({})",
        latitude,
        longitude,
        altitude,
        tz.name()
    );

    Ok(Location {
        latitude,
        longitude,
        altitude,
        timezone: tz,
    })
}

/// Parse a configured zone name, falling back to the default zone if unknown.
pub fn parse_zone(name: &str) -> Result<Tz, Error> {
    match name.parse::<Tz>() {
        Ok(tz) => Ok(tz),
        Err(_) => {
            tracing::warn!("Unknown timezone '{}', using {}", name, crate::DEFAULT_TIMEZONE);
            crate::DEFAULT_TIMEZONE
                .parse()
                .map_err(|_| Error::Config(format!("Unknown timezone '{}'", name)))
        }
    }
}

/// Derive the IANA zone from coordinate strings.
///
/// Returns `None` when the coordinates are not numeric, the lookup has no
/// answer, or the crate was built without the `tz-lookup` feature.
pub fn lookup_zone(latitude: &str, longitude: &str) -> Option<Tz> {
    let lat: f64 = latitude.trim().parse().ok()?;
    let lon: f64 = longitude.trim().parse().ok()?;
    let name = zone_name_at(lat, lon)?;
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            tracing::warn!("Lookup returned unknown zone '{}'", name);
            None
        }
    }
}

#[cfg(feature = "tz-lookup")]
fn zone_name_at(lat: f64, lon: f64) -> Option<String> {
    use std::sync::OnceLock;

    static FINDER: OnceLock<tzf_rs::DefaultFinder> = OnceLock::new();

    let finder = FINDER.get_or_init(tzf_rs::DefaultFinder::new);
    let name = finder.get_tz_name(lon, lat);
    if name.is_empty() {
        None
    } else {
        tracing::debug!("Timezone at ({}, {}) is {}", lat, lon, name);
        Some(name.to_string())
    }
}

#[cfg(not(feature = "tz-lookup"))]
fn zone_name_at(_lat: f64, _lon: f64) -> Option<String> {
    None
}
