use crate::domain::display::DisplayMode;
use crate::domain::ports::PreferenceStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};

pub const DISPLAY_MODE_KEY: &str = "displayMode";

/// Owner of the persisted display mode.
pub struct DisplayModeService {
    store: Arc<dyn PreferenceStore>,
    mode: Mutex<DisplayMode>,
}

impl DisplayModeService {
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let mode = match store.get(DISPLAY_MODE_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("DisplayModeService: Invalid persisted mode, using default: {}", e);
                DisplayMode::default()
            }),
            Ok(None) => DisplayMode::default(),
            Err(e) => {
                warn!("DisplayModeService: Could not read display mode, using default: {}", e);
                DisplayMode::default()
            }
        };

        Self {
            store,
            mode: Mutex::new(mode),
        }
    }

    pub fn current_mode(&self) -> DisplayMode {
        *self.lock()
    }

    /// Records `mode` as current and persists it.
    pub fn set_mode(&self, mode: DisplayMode) {
        let mut current = self.lock();
        *current = mode;
        self.persist(mode);
    }

    fn lock(&self) -> MutexGuard<'_, DisplayMode> {
        self.mode.lock().unwrap_or_else(|p| p.into_inner())
    }

    // Called with the mode lock held so the store never lags behind memory.
    fn persist(&self, mode: DisplayMode) {
        match serde_json::to_value(mode) {
            Ok(value) => {
                if let Err(e) = self.store.set(DISPLAY_MODE_KEY, value) {
                    error!("DisplayModeService: Failed to persist display mode: {:#}", e);
                }
            }
            Err(e) => error!("DisplayModeService: Failed to encode display mode: {}", e),
        }
        info!("DisplayModeService: Mode is now {:?}", mode);
    }
}
