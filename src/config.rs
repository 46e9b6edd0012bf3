//! Run configuration.
//!
//! A single surface covers every way the tool can be set up: where the
//! station location comes from, how its timezone is chosen, which API host
//! to ask, caching, and how the panel is drawn. All fields have defaults,
//! so an empty file is a valid configuration.
//!
//! # Example (YAML)
//!
//! ```yaml
//! location:
//!   source: interactive      # or "fixed"
//!   latitude: "29.27371"     # used when source is fixed
//!   longitude: "-95.35739"
//!   altitude: "0"
//!
//! timezone:
//!   source: lookup           # or "fixed"
//!   zone: "US/Central"       # fixed zone, and the fallback for lookup
//!
//! api:
//!   base_url: "http://api.satellites.calum.org"
//!   timeout_secs: 30
//!
//! cache:
//!   enabled: true
//!   path: "cache_api.json"
//!   expire_after_secs: 60
//!
//! display:
//!   width: 212
//!   height: 104
//!   ink: red
//!   output: "inky.png"
//!
//! prompt:
//!   validate_names: true
//!   max_attempts: 5
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::display::Ink;
use crate::Error;
use crate::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Complete run configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Station location
    pub location: LocationConfig,
    /// Timezone used for displayed times
    pub timezone: TimezoneConfig,
    /// Prediction API
    pub api: ApiConfig,
    /// Response cache
    pub cache: CacheConfig,
    /// Panel geometry and output
    pub display: DisplayConfig,
    /// Interactive prompt behaviour
    pub prompt: PromptConfig,
}

/// Where the station coordinates come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// Use the configured coordinates
    #[default]
    Fixed,
    /// Ask on the console
    Interactive,
}

/// How the display timezone is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezoneSource {
    /// Use the configured zone
    #[default]
    Fixed,
    /// Derive the zone from the coordinates, falling back to the configured zone
    Lookup,
}

/// Station location settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Fixed coordinates or console prompt
    pub source: LocationSource,
    /// Latitude in decimal degrees
    pub latitude: String,
    /// Longitude in decimal degrees
    pub longitude: String,
    /// Altitude in feet
    pub altitude: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Houston, TX
        Self {
            source: LocationSource::Fixed,
            latitude: "29.27371".to_string(),
            longitude: "-95.35739".to_string(),
            altitude: "0".to_string(),
        }
    }
}

/// Timezone settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimezoneConfig {
    /// Fixed zone or coordinate lookup
    pub source: TimezoneSource,
    /// IANA zone name (e.g., "US/Central")
    pub zone: String,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            source: TimezoneSource::Fixed,
            zone: crate::DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Prediction API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host of the prediction API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Read and write the cache file
    pub enabled: bool,
    /// Cache file location
    pub path: PathBuf,
    /// Entry lifetime in seconds
    pub expire_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("cache_api.json"),
            expire_after_secs: 60,
        }
    }
}

/// Panel geometry and output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Ink color
    pub ink: Ink,
    /// Where the PNG panel writes the frame
    pub output: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            ink: Ink::Black,
            output: PathBuf::from("inky.png"),
        }
    }
}

/// Interactive prompt settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Re-ask for unknown satellite names instead of failing
    pub validate_names: bool,
    /// Give up after this many invalid answers (unset = ask forever)
    pub max_attempts: Option<u32>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            validate_names: true,
            max_attempts: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("Invalid config YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(Error::Config(format!(
                "display size must be non-zero, got {}x{}",
                self.display.width, self.display.height
            )));
        }
        if self.prompt.max_attempts == Some(0) {
            return Err(Error::Config("prompt.max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_houston_station() {
        let config = Config::default();
        assert_eq!(config.location.source, LocationSource::Fixed);
        assert_eq!(config.location.latitude, "29.27371");
        assert_eq!(config.location.longitude, "-95.35739");
        assert_eq!(config.location.altitude, "0");
        assert_eq!(config.timezone.zone, "US/Central");
        assert_eq!(config.cache.expire_after_secs, 60);
        assert_eq!(config.display.width, 212);
        assert_eq!(config.display.height, 104);
        assert!(config.prompt.validate_names);
        assert_eq!(config.prompt.max_attempts, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r#"
location:
  source: interactive
timezone:
  source: lookup
  zone: "America/Chicago"
display:
  ink: red
prompt:
  max_attempts: 3
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.location.source, LocationSource::Interactive);
        assert_eq!(config.location.latitude, "29.27371");
        assert_eq!(config.timezone.source, TimezoneSource::Lookup);
        assert_eq!(config.timezone.zone, "America/Chicago");
        assert_eq!(config.display.ink, Ink::Red);
        assert_eq!(config.display.width, 212);
        assert_eq!(config.prompt.max_attempts, Some(3));
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("location: [1, 2").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_source_rejected() {
        let err = Config::from_yaml("location:\n  source: gps\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = Config::from_yaml("prompt:\n  max_attempts: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_sample_config_parses() {
        let config = Config::from_yaml(include_str!("../config/inky-amsat.yaml")).unwrap();
        assert_eq!(config.location.latitude, "29.27371");
        assert_eq!(config.display.ink, Ink::Black);
        assert_eq!(config.prompt.max_attempts, None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/inky-amsat.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
