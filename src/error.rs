//! Error types for inky-amsat.

use thiserror::Error;

/// Errors that can occur while fetching and rendering a pass.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed for a reason other than connectivity
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Prediction API could not be reached (connection refused, timeout)
    #[error("API Unreachable: {0}")]
    Unreachable(String),

    /// Prediction API does not know this NORAD ID (HTTP 404)
    #[error("NORAD ID doesn't exist: {norad}")]
    NotFound {
        /// The identifier that was requested
        norad: String,
    },

    /// Response body did not match the expected pass record
    #[error("JSON serialization error: {0}")]
    Serialization(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Console or file I/O failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Top-level menu choice was not one of the offered actions
    #[error("No valid action selected: {0:?}")]
    InvalidAction(String),

    /// Satellite name is not in any catalog
    #[error("Unknown satellite: {0}")]
    UnknownSatellite(String),

    /// Input stream ended while a prompt was waiting for an answer
    #[error("Input closed while waiting for {0}")]
    InputClosed(String),

    /// Prompt was answered with invalid input too many times
    #[error("Too many invalid attempts for {what} (limit {limit})")]
    TooManyAttempts {
        /// What was being asked for
        what: String,
        /// Configured attempt limit
        limit: u32,
    },

    /// Timestamp from the API could not be parsed
    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    /// Frame could not be handed to the panel
    #[error("Display update failed: {0}")]
    Display(String),
}

impl Error {
    /// Whether this error means the API host could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Unreachable(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::Unreachable(err.to_string())
        } else {
            Error::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
