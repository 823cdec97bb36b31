//! Configuration module for coinbar.
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured by the binary), organized by concern: quote venues and polling.

mod polling_config;
mod venue_config;

pub use polling_config::PollingConfig;
pub use venue_config::VenueConfig;

use crate::application::market_data::AggregatorSettings;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Source of raw configuration values, normally the process environment.
pub type Lookup = dyn Fn(&str) -> Option<String>;

pub(crate) fn parse_or<T>(lookup: &Lookup, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub venues: VenueConfig,
    pub polling: PollingConfig,
    /// Overrides the default `~/.coinbar/settings.json` location.
    pub settings_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok().filter(|v| !v.is_empty()))
    }

    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        Ok(Self {
            venues: VenueConfig::from_lookup(lookup).context("Invalid venue configuration")?,
            polling: PollingConfig::from_lookup(lookup)
                .context("Invalid polling configuration")?,
            settings_path: lookup("COINBAR_SETTINGS_PATH").map(PathBuf::from),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.poll_interval_secs)
    }

    pub fn rotation_period(&self) -> Duration {
        Duration::from_secs(self.polling.rotation_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.venues.http_timeout_secs)
    }

    pub fn aggregator_settings(&self) -> AggregatorSettings {
        AggregatorSettings {
            assets: self.polling.tracked_assets.clone(),
            display_priority: self.polling.display_priority.clone(),
            fx_max_age: Duration::from_secs(self.polling.fx_cache_secs),
        }
    }
}
