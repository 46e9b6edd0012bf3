//! Turn a pass prediction into the five lines shown on the panel.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::client::PassPrediction;
use crate::Error;

/// Degree sign appended to angles.
const DEGREE: char = '\u{00B0}';

/// A pass converted to local time, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    /// Satellite name
    pub name: String,
    /// Acquisition of signal
    pub aos: DateTime<Tz>,
    /// Time of closest approach
    pub tca: DateTime<Tz>,
    /// Loss of signal
    pub los: DateTime<Tz>,
    /// Azimuth at AOS, as the API encoded it
    pub aos_azimuth: String,
    /// Peak elevation, as the API encoded it
    pub max_elevation: String,
    /// Azimuth at LOS, as the API encoded it
    pub los_azimuth: String,
}

impl PassSummary {
    /// Convert a prediction's timestamps into `tz`.
    pub fn from_prediction(pass: &PassPrediction, tz: Tz) -> Result<Self, Error> {
        Ok(Self {
            name: pass.name.clone(),
            aos: parse_timestamp(&pass.start)?.with_timezone(&tz),
            tca: parse_timestamp(&pass.tca)?.with_timezone(&tz),
            los: parse_timestamp(&pass.end)?.with_timezone(&tz),
            aos_azimuth: pass.aosazimuth.to_string(),
            max_elevation: pass.maxel.to_string(),
            los_azimuth: pass.losazimuth.to_string(),
        })
    }

    /// Time between AOS and LOS.
    pub fn duration(&self) -> TimeDelta {
        self.los.signed_duration_since(self.aos)
    }

    /// The five display lines, top to bottom.
    pub fn lines(&self) -> [String; 5] {
        [
            self.name.clone(),
            format!("AOS:  {} @ {}{}", clock(&self.aos), self.aos_azimuth, DEGREE),
            format!(
                "Peak: {} @ {}{}E",
                clock(&self.tca),
                self.max_elevation,
                DEGREE
            ),
            format!("LOS:  {} @ {}{}", clock(&self.los), self.los_azimuth, DEGREE),
            format!("Pass: {}", format_duration(self.duration())),
        ]
    }
}

fn clock(t: &DateTime<Tz>) -> String {
    t.format("%H:%M:%S").to_string()
}

/// Parse an ISO-8601 timestamp; timestamps without an offset are UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, Error> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::Timestamp(s.to_string()))
}

/// Format a duration as `H:MM:SS`, with a day count beyond 24 hours and
/// microseconds when not whole seconds (`0:10:00`, `1 day, 2:03:04`).
pub fn format_duration(d: TimeDelta) -> String {
    const MICROS_PER_DAY: i64 = 86_400 * 1_000_000;

    let total = d.num_microseconds().unwrap_or(i64::MAX);
    let days = total.div_euclid(MICROS_PER_DAY);
    let rem = total.rem_euclid(MICROS_PER_DAY);

    let micros = rem % 1_000_000;
    let secs = rem / 1_000_000;
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);

    let mut out = String::new();
    if days != 0 {
        let unit = if days.abs() == 1 { "day" } else { "days" };
        out.push_str(&format!("{} {}, ", days, unit));
    }
    out.push_str(&format!("{}:{:02}:{:02}", h, m, s));
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}
