//! Polling, caching and display timing configuration.

use super::{Lookup, parse_or};
use crate::domain::asset::{Asset, parse_asset_list};
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub poll_interval_secs: u64,
    pub fx_cache_secs: u64,
    pub rotation_interval_secs: u64,
    pub tracked_assets: Vec<Asset>,
    pub display_priority: Vec<Asset>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 120,
            fx_cache_secs: 1800,
            rotation_interval_secs: 3,
            tracked_assets: Asset::ALL.to_vec(),
            display_priority: vec![Asset::Btc, Asset::Eth, Asset::Usdt, Asset::Usdc],
        }
    }
}

impl PollingConfig {
    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        let defaults = Self::default();

        let tracked_assets = match lookup("TRACKED_ASSETS") {
            Some(raw) => parse_asset_list(&raw).context("Invalid TRACKED_ASSETS")?,
            None => defaults.tracked_assets,
        };
        if tracked_assets.is_empty() {
            anyhow::bail!("TRACKED_ASSETS must name at least one asset");
        }

        let display_priority = match lookup("DISPLAY_PRIORITY") {
            Some(raw) => parse_asset_list(&raw).context("Invalid DISPLAY_PRIORITY")?,
            None => defaults.display_priority,
        };

        let config = Self {
            poll_interval_secs: parse_or(lookup, "POLL_INTERVAL_SECS", defaults.poll_interval_secs)?,
            fx_cache_secs: parse_or(lookup, "FX_CACHE_SECS", defaults.fx_cache_secs)?,
            rotation_interval_secs: parse_or(
                lookup,
                "ROTATION_INTERVAL_SECS",
                defaults.rotation_interval_secs,
            )?,
            tracked_assets,
            display_priority,
        };

        if config.poll_interval_secs == 0 {
            anyhow::bail!("POLL_INTERVAL_SECS must be greater than zero");
        }
        if config.rotation_interval_secs == 0 {
            anyhow::bail!("ROTATION_INTERVAL_SECS must be greater than zero");
        }
        Ok(config)
    }
}
