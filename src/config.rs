//! Run configuration.
//!
//! One optional TOML file selects the profile, switches flip-mode touchpad
//! toggling, and can override the tipping point values for firmware
//! revisions shipping different thresholds. No file means the defaults:
//! quiet profile with flip mode on.

use std::fs::read_to_string;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::thermal::{DEFAULT_TIPPING_POINTS, QUIET_TIPPING_POINTS};

pub const CONFIG_FILE: &str = "/etc/pavilion-fan/config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Default,
    Quiet,
}

impl Profile {
    pub fn tipping_points(self) -> &'static [u8] {
        match self {
            Profile::Default => &DEFAULT_TIPPING_POINTS,
            Profile::Quiet => &QUIET_TIPPING_POINTS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which named table to apply.
    pub profile: Profile,
    /// Whether to read the orientation flag and toggle the touchpads.
    pub flip_mode: bool,
    /// Replaces the profile's table when set. At most 8 entries.
    pub tipping_points: Option<Vec<u8>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::Quiet,
            flip_mode: true,
            tipping_points: None,
        }
    }
}

impl Config {
    /// A missing file means defaults; a file that exists but cannot be
    /// read or parsed is fatal.
    pub fn load(path: &str) -> Result<Config> {
        if !Path::new(path).exists() {
            debug!("no config at {}, using defaults", path);
            return Ok(Config::default());
        }
        let toml_str = read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_string(),
            source,
        })?;
        toml::de::from_str(&toml_str).map_err(|source| Error::ConfigParse {
            path: path.to_string(),
            source,
        })
    }

    /// Table this run should write: the override when present, the
    /// profile's built-in table otherwise.
    pub fn points(&self) -> &[u8] {
        match &self.tipping_points {
            Some(points) => points,
            None => self.profile.tipping_points(),
        }
    }
}
