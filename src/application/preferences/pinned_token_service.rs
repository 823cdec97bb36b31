use crate::domain::asset::Asset;
use crate::domain::display::{MAX_PINNED, PinToggle, PinnedSet};
use crate::domain::errors::PinError;
use crate::domain::ports::PreferenceStore;
use serde_json::Value;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};

pub const PINNED_TOKENS_KEY: &str = "pinnedTokens";

/// Owner of the persisted pinned selection.
///
/// Toggles run as a single read-modify-write under one lock so concurrent
/// requests can never push the set outside its 1..=3 bound.
pub struct PinnedTokenService {
    store: Arc<dyn PreferenceStore>,
    pinned: Mutex<PinnedSet>,
}

impl PinnedTokenService {
    /// Loads the persisted selection, falling back to the default set.
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let pinned = match store.get(PINNED_TOKENS_KEY) {
            Ok(Some(value)) => parse_pinned(&value),
            Ok(None) => PinnedSet::default(),
            Err(e) => {
                warn!("PinnedTokenService: Could not read pinned tokens, using defaults: {}", e);
                PinnedSet::default()
            }
        };
        info!("PinnedTokenService: Pinned {:?}", pinned.assets());

        Self {
            store,
            pinned: Mutex::new(pinned),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PinnedSet> {
        self.pinned
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn pinned_tokens(&self) -> Vec<Asset> {
        self.lock().assets().to_vec()
    }

    pub fn is_pinned(&self, asset: Asset) -> bool {
        self.lock().contains(asset)
    }

    /// Pins or unpins `asset`. Rejected toggles leave the set untouched.
    pub fn toggle_pinned(&self, asset: Asset) -> Result<PinToggle, PinError> {
        let mut pinned = self.lock();
        let mut next = pinned.clone();
        let outcome = next.toggle(asset)?;
        *pinned = next;

        let value = Value::from(
            pinned
                .assets()
                .iter()
                .map(|a| a.code())
                .collect::<Vec<_>>(),
        );
        if let Err(e) = self.store.set(PINNED_TOKENS_KEY, value) {
            error!("PinnedTokenService: Failed to persist pinned tokens: {:#}", e);
        }

        info!("PinnedTokenService: {:?} {} -> {:?}", outcome, asset, pinned.assets());
        Ok(outcome)
    }
}

fn parse_pinned(value: &Value) -> PinnedSet {
    let Some(items) = value.as_array() else {
        warn!("PinnedTokenService: Persisted pinned tokens are not a list, using defaults");
        return PinnedSet::default();
    };

    let assets: Vec<Asset> = items
        .iter()
        .filter_map(|item| {
            let parsed = item.as_str().map(Asset::from_str);
            match parsed {
                Some(Ok(asset)) => Some(asset),
                _ => {
                    warn!("PinnedTokenService: Skipping unknown pinned token {}", item);
                    None
                }
            }
        })
        .collect();

    if assets.is_empty() {
        warn!("PinnedTokenService: No usable pinned tokens persisted, using defaults");
    } else if assets.len() > MAX_PINNED {
        warn!(
            "PinnedTokenService: {} pinned tokens persisted, keeping the first {}",
            assets.len(),
            MAX_PINNED
        );
    }
    PinnedSet::from_assets(assets)
}
