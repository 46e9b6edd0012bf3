//! # inky-amsat
//!
//! Shows the next pass of an amateur-radio satellite on an
//! [Inky pHAT](https://shop.pimoroni.com/products/inky-phat) e-ink display.
//!
//! A run is one straight line:
//! - Resolve the station location (fixed or prompted) and its timezone
//! - Pick a satellite from the FM or transponder catalog, or enter a NORAD ID
//! - Ask the public pass-prediction API for the next pass
//! - Format five lines and fit each one to the panel width
//! - Draw the lines into a bitmap and hand it to the panel
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inky_amsat::{App, Client, Config, PngPanel};
//! use inky_amsat::prompt::Console;
//!
//! # fn example() -> Result<(), inky_amsat::Error> {
//! let config = Config::default();
//! let panel = PngPanel::new("inky.png", config.display.width, config.display.height);
//!
//! let mut app = App::new(&config, Client::new(), Console::stdio(), panel);
//! let layout = app.run(Some("27607".to_string()))?;
//! for line in &layout.lines {
//!     println!("{} (size {})", line.text, line.font_size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Display Dimensions
//!
//! The Inky pHAT is 212x104 pixels with a white background and one ink
//! color (black or red, depending on the model). Every line starts at font
//! size 20 and shrinks by 2 until it fits the 212 pixel width.
//!
//! ## Prediction API
//!
//! | Endpoint | Method | Purpose |
//! |----------|--------|---------|
//! | `/rest/v1/{norad}/next-pass?lat=..&lon=..&alt=..` | GET | Next pass over a location |
//!
//! A 404 means the API does not know the NORAD ID; the user is asked for
//! another one.
//!
//! ## Feature Flags
//!
//! - `tz-lookup` - Derive the display timezone from the station coordinates

pub mod app;
pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod display;
mod error;
pub mod format;
pub mod location;
pub mod prompt;
pub mod render;

pub use app::App;
pub use cache::ResponseCache;
pub use client::{Client, PassPrediction, PassPredictor};
pub use config::Config;
pub use display::{Frame, Ink, Panel, PngPanel};
pub use error::Error;
pub use location::Location;

/// Inky pHAT display width in pixels
pub const DISPLAY_WIDTH: u32 = 212;

/// Inky pHAT display height in pixels
pub const DISPLAY_HEIGHT: u32 = 104;

/// Public pass-prediction API
pub const DEFAULT_API_BASE_URL: &str = "http://api.satellites.calum.org";

/// HTTP request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Zone used when none is configured or the lookup fails
pub const DEFAULT_TIMEZONE: &str = "US/Central";
