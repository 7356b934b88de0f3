//! Configuration for the orrery core
//!
//! Settings are read from JSON. Every field has a default, so an empty object
//! `{}` yields the standard setup: 10 scene units per AU, a 1900-01-01 to
//! 2100-12-31 date range, starting at J2000 and playing forward at 1×.
//!
//! ```json
//! {
//!   "spatial_scale": 25.0,
//!   "start": "now",
//!   "rate_exponent": 1.0,
//!   "reversed": true
//! }
//! ```

use crate::clock::{DEFAULT_MAX_RATE_EXPONENT, DEFAULT_MIN_RATE_EXPONENT};
use crate::constants::DEFAULT_SPATIAL_SCALE;
use crate::time::{j2000_instant, parse_calendar_date, parse_instant};
use crate::{OrreryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Instant the simulated clock starts from
///
/// Serialized as a plain string and parsed with [`FromStr`], so JSON and the
/// command line accept the same spellings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StartInstant {
    /// 2000-01-01T12:00:00 UTC
    #[default]
    J2000,
    /// The real-world time when the clock is built
    Now,
    /// An RFC 3339 timestamp or `YYYY-MM-DD` date
    At(String),
}

impl StartInstant {
    /// Resolve to a concrete UTC instant
    pub fn resolve(&self) -> Result<DateTime<Utc>> {
        match self {
            StartInstant::J2000 => Ok(j2000_instant()),
            StartInstant::Now => Ok(Utc::now()),
            StartInstant::At(text) => parse_instant(text),
        }
    }
}

impl TryFrom<String> for StartInstant {
    type Error = OrreryError;

    fn try_from(text: String) -> Result<Self> {
        text.parse()
    }
}

impl From<StartInstant> for String {
    fn from(start: StartInstant) -> Self {
        match start {
            StartInstant::J2000 => "j2000".to_string(),
            StartInstant::Now => "now".to_string(),
            StartInstant::At(text) => text,
        }
    }
}

impl FromStr for StartInstant {
    type Err = OrreryError;

    fn from_str(text: &str) -> Result<Self> {
        match text.trim().to_lowercase().as_str() {
            "j2000" | "epoch" => Ok(StartInstant::J2000),
            "now" | "today" => Ok(StartInstant::Now),
            _ => {
                parse_instant(text)?;
                Ok(StartInstant::At(text.trim().to_string()))
            }
        }
    }
}

/// Orrery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Scene units per astronomical unit
    pub spatial_scale: f64,
    /// Earliest simulated date, `YYYY-MM-DD`
    pub min_date: String,
    /// Latest simulated date, `YYYY-MM-DD`
    pub max_date: String,
    /// Where the clock starts
    pub start: StartInstant,
    /// Initial rate exponent, time scale = 10^exponent
    pub rate_exponent: f64,
    /// Lowest rate exponent the speed control allows
    pub min_rate_exponent: f64,
    /// Highest rate exponent the speed control allows
    pub max_rate_exponent: f64,
    /// Start playing instead of paused
    pub playing: bool,
    /// Start with time running backwards
    pub reversed: bool,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            spatial_scale: DEFAULT_SPATIAL_SCALE,
            min_date: "1900-01-01".to_string(),
            max_date: "2100-12-31".to_string(),
            start: StartInstant::J2000,
            rate_exponent: 0.0,
            min_rate_exponent: DEFAULT_MIN_RATE_EXPONENT,
            max_rate_exponent: DEFAULT_MAX_RATE_EXPONENT,
            playing: true,
            reversed: false,
        }
    }
}

impl OrreryConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: OrreryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading orrery configuration from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every setting against its invariants
    pub fn validate(&self) -> Result<()> {
        if !self.spatial_scale.is_finite() || self.spatial_scale <= 0.0 {
            return Err(OrreryError::Config(format!(
                "spatial_scale must be positive and finite, got {}",
                self.spatial_scale
            )));
        }

        let (min_date, max_date) = self.clock_bounds()?;
        if min_date >= max_date {
            return Err(OrreryError::Config(format!(
                "min_date {} must be before max_date {}",
                self.min_date, self.max_date
            )));
        }

        let exponents = [
            ("rate_exponent", self.rate_exponent),
            ("min_rate_exponent", self.min_rate_exponent),
            ("max_rate_exponent", self.max_rate_exponent),
        ];
        for (name, value) in exponents {
            if !value.is_finite() {
                return Err(OrreryError::Config(format!("{name} must be finite")));
            }
        }
        if !(self.min_rate_exponent <= 0.0 && 0.0 <= self.max_rate_exponent) {
            return Err(OrreryError::Config(format!(
                "rate exponent range [{}, {}] must contain 0",
                self.min_rate_exponent, self.max_rate_exponent
            )));
        }

        if let StartInstant::At(text) = &self.start {
            parse_instant(text)?;
        }
        Ok(())
    }

    /// Date range as UTC midnights
    pub fn clock_bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((
            parse_calendar_date(&self.min_date)?,
            parse_calendar_date(&self.max_date)?,
        ))
    }
}
