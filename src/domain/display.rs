//! Display preferences: the mode and the pinned asset selection.

use crate::domain::asset::Asset;
use crate::domain::errors::PinError;
use serde::{Deserialize, Serialize};

pub const MIN_PINNED: usize = 1;
pub const MAX_PINNED: usize = 3;

pub const DEFAULT_PINNED: [Asset; 3] = [Asset::Btc, Asset::Eth, Asset::Usdt];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Show the pinned assets side by side.
    #[default]
    Pinned,
    /// Rotate through every asset one at a time.
    Auto,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Pinned => DisplayMode::Auto,
            DisplayMode::Auto => DisplayMode::Pinned,
        }
    }
}

/// Outcome of an accepted pin toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinToggle {
    Pinned,
    Unpinned,
}

/// Ordered, duplicate-free selection of 1 to 3 assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedSet {
    assets: Vec<Asset>,
}

impl PinnedSet {
    /// Builds a set from possibly untrusted data.
    ///
    /// Duplicates are dropped, the list is truncated to the maximum, and an
    /// empty result falls back to the default selection.
    pub fn from_assets(assets: impl IntoIterator<Item = Asset>) -> Self {
        let mut unique: Vec<Asset> = Vec::with_capacity(MAX_PINNED);
        for asset in assets {
            if unique.len() == MAX_PINNED {
                break;
            }
            if !unique.contains(&asset) {
                unique.push(asset);
            }
        }
        if unique.is_empty() {
            return Self::default();
        }
        Self { assets: unique }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn contains(&self, asset: Asset) -> bool {
        self.assets.contains(&asset)
    }

    pub fn add(&mut self, asset: Asset) -> Result<(), PinError> {
        if self.contains(asset) {
            return Err(PinError::AlreadyPinned(asset));
        }
        if self.assets.len() >= MAX_PINNED {
            return Err(PinError::AtCapacity { max: MAX_PINNED });
        }
        self.assets.push(asset);
        Ok(())
    }

    pub fn remove(&mut self, asset: Asset) -> Result<(), PinError> {
        let index = self
            .assets
            .iter()
            .position(|a| *a == asset)
            .ok_or(PinError::NotPinned(asset))?;
        if self.assets.len() <= MIN_PINNED {
            return Err(PinError::LastPinned { min: MIN_PINNED });
        }
        self.assets.remove(index);
        Ok(())
    }

    /// Removes a pinned asset or adds an unpinned one, respecting the bounds.
    pub fn toggle(&mut self, asset: Asset) -> Result<PinToggle, PinError> {
        if self.contains(asset) {
            self.remove(asset).map(|_| PinToggle::Unpinned)
        } else {
            self.add(asset).map(|_| PinToggle::Pinned)
        }
    }
}

impl Default for PinnedSet {
    fn default() -> Self {
        Self {
            assets: DEFAULT_PINNED.to_vec(),
        }
    }
}
