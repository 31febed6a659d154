//! Extension-set configuration with built-in defaults.
//!
//! [`ExtensionConfig`] carries the static catalogs and copy the booking flow
//! renders, plus the timings used by the animation extensions. The defaults
//! are the built-in constants; a TOML file may override any subset of keys.
//!
//! ```toml
//! time_slots = ["9:00-9:45 AM PST"]
//! waiting_delay_ms = 5000
//!
//! [[dealerships]]
//! name = "RENAULT MONTROUGE"
//! address = "59 Avenue Aristide Briand, 75014 Paris"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::booking::catalog::{
    Catalog, Dealership, Vehicle, default_dealerships, default_time_slots, default_vehicles,
};
use crate::error::ConfigError;

pub const DEFAULT_COUNTRY: &str = "United States";
pub const DEFAULT_WAITING_TEXT: &str = "Please wait...";
pub const DEFAULT_WAITING_DELAY_MS: u64 = 3000;
/// Pause before an animation extension renders or signals the host.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 250;
pub const DEFAULT_CONSENT_TEXT: &str = "By clicking below to book a demo drive, I authorize \
the dealership to contact me via email or at the number provided about my demo drive and to \
give me more information about its products, news and events.";

/// Configuration for the whole extension set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Default: the four built-in dealerships.
    pub dealerships: Vec<Dealership>,
    /// Default: `r5i` and `r5t`.
    pub vehicles: Vec<Vehicle>,
    /// Default: `["10:15-11:00 AM PST", "2:30-3:15 PM PST"]`.
    pub time_slots: Vec<String>,
    /// Choices for the contact form's country field. Default: `["United States"]`.
    pub countries: Vec<String>,
    /// Pre-selected country. Default: `"United States"`.
    pub default_country: String,
    pub consent_text: String,
    /// Waiting text when the trace carries none. Default: `"Please wait..."`.
    pub waiting_text: String,
    /// Waiting timeout when the trace carries none. Default: `3000`.
    pub waiting_delay_ms: u64,
    /// Default: `250`.
    pub settle_delay_ms: u64,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            dealerships: default_dealerships(),
            vehicles: default_vehicles(),
            time_slots: default_time_slots(),
            countries: vec![DEFAULT_COUNTRY.to_string()],
            default_country: DEFAULT_COUNTRY.to_string(),
            consent_text: DEFAULT_CONSENT_TEXT.to_string(),
            waiting_text: DEFAULT_WAITING_TEXT.to_string(),
            waiting_delay_ms: DEFAULT_WAITING_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl ExtensionConfig {
    /// Parse a TOML document. Keys not present keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dealerships.is_empty() {
            return Err(ConfigError::EmptyCatalog("dealerships"));
        }
        if self.vehicles.is_empty() {
            return Err(ConfigError::EmptyCatalog("vehicles"));
        }
        if self.time_slots.is_empty() {
            return Err(ConfigError::EmptyCatalog("time_slots"));
        }
        if self.countries.is_empty() {
            return Err(ConfigError::EmptyCatalog("countries"));
        }
        Ok(())
    }

    /// The booking catalogs carried by this config.
    pub fn catalog(&self) -> Catalog {
        Catalog {
            dealerships: self.dealerships.clone(),
            vehicles: self.vehicles.clone(),
            time_slots: self.time_slots.clone(),
            countries: self.countries.clone(),
            default_country: self.default_country.clone(),
            consent_text: self.consent_text.clone(),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn waiting_delay(&self) -> Duration {
        Duration::from_millis(self.waiting_delay_ms)
    }
}
