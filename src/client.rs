//! Client for the satellite pass-prediction REST API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::ResponseCache;
use crate::error::Error;
use crate::location::Location;
use crate::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Next pass of a satellite, as returned by the API.
///
/// Timestamps stay as the API's ISO-8601 strings; angles keep the exact
/// number formatting the API used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassPrediction {
    /// Satellite name
    pub name: String,
    /// Acquisition of signal
    pub start: String,
    /// Time of closest approach
    pub tca: String,
    /// Loss of signal
    pub end: String,
    /// Azimuth at AOS in degrees
    pub aosazimuth: serde_json::Number,
    /// Maximum elevation in degrees
    pub maxel: serde_json::Number,
    /// Azimuth at LOS in degrees
    pub losazimuth: serde_json::Number,
}

/// Anything that can predict the next pass for a NORAD ID.
pub trait PassPredictor {
    /// Predict the next pass of `norad` over `location`.
    fn next_pass(&mut self, norad: &str, location: &Location) -> Result<PassPrediction, Error>;
}

/// Blocking client for `GET /rest/v1/{norad}/next-pass`.
///
/// # Example
///
/// ```rust,no_run
/// use inky_amsat::{Client, Location, PassPredictor};
///
/// # fn example() -> Result<(), inky_amsat::Error> {
/// let mut client = Client::new();
/// let station = Location::new("29.27371", "-95.35739", "0", chrono_tz::US::Central);
///
/// let pass = client.next_pass("27607", &station)?;
/// println!("{} rises at {}", pass.name, pass.start);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
    cache: Option<ResponseCache>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client for the public API with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self {
            http,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            cache: None,
        }
    }

    /// Set a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Serve repeated requests from a response cache.
    #[must_use]
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attached response cache, if any.
    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Build the next-pass URL for `norad` over `location`.
    ///
    /// ```
    /// use inky_amsat::{Client, Location};
    ///
    /// let client = Client::new().with_base_url("http://localhost:8080");
    /// let station = Location::new("29.27371", "-95.35739", "0", chrono_tz::UTC);
    /// assert_eq!(
    ///     client.next_pass_url("27607", &station),
    ///     "http://localhost:8080/rest/v1/27607/next-pass?lat=29.27371&lon=-95.35739&alt=0"
    /// );
    /// ```
    pub fn next_pass_url(&self, norad: &str, location: &Location) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("lat", &location.latitude)
            .append_pair("lon", &location.longitude)
            .append_pair("alt", &location.altitude)
            .finish();
        format!("{}/rest/v1/{}/next-pass?{}", self.base_url, norad, query)
    }

    fn fetch(&self, url: &str, norad: &str) -> Result<String, Error> {
        if let Some(body) = self.cache.as_ref().and_then(|c| c.get(url)) {
            return Ok(body);
        }

        tracing::info!("Requesting {}", url);
        let response = self.http.get(url).send()?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                norad: norad.to_string(),
            });
        }

        let body = response.text()?;
        if status == reqwest::StatusCode::OK {
            if let Some(cache) = &self.cache {
                cache.put(url, &body);
            }
        } else {
            tracing::debug!("API returned {}, parsing body anyway", status);
        }
        Ok(body)
    }
}

impl PassPredictor for Client {
    fn next_pass(&mut self, norad: &str, location: &Location) -> Result<PassPrediction, Error> {
        let url = self.next_pass_url(norad, location);

        let body = match self.fetch(&url, norad) {
            Ok(body) => body,
            Err(e) if e.is_unreachable() => {
                tracing::error!("Prediction API unreachable: {}", e);
                if let Some(cache) = self.cache.as_mut() {
                    cache.disable();
                }
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let pass: PassPrediction = serde_json::from_str(&body)?;
        tracing::debug!("Next pass: {:?}", pass);
        Ok(pass)
    }
}
