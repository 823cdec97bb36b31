use crate::domain::ports::PreferenceStore;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Preference store backed by a single JSON object on disk.
pub struct SettingsPersistence {
    file_path: PathBuf,
    // Serializes read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl SettingsPersistence {
    /// Uses `~/.coinbar/settings.json`.
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").context("Could not find HOME directory")?;
        Self::at_path(PathBuf::from(home).join(".coinbar").join("settings.json"))
    }

    pub fn at_path(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        if let Some(dir) = file_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).context("Failed to create settings directory")?;
            }
        }

        Ok(Self {
            file_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_all(&self) -> Result<Map<String, Value>> {
        if !self.file_path.exists() {
            return Ok(Map::new());
        }

        let content =
            fs::read_to_string(&self.file_path).context("Failed to read settings file")?;
        let settings: Map<String, Value> =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;
        Ok(settings)
    }

    fn save_all(&self, settings: &Map<String, Value>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content).context("Failed to write temp settings file")?;
        fs::rename(&temp_path, &self.file_path).context("Failed to rename settings file")?;

        info!("Saved settings to {:?}", self.file_path);
        Ok(())
    }
}

impl PreferenceStore for SettingsPersistence {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let value = self.load_all()?.remove(key);
        debug!("SettingsPersistence: get {} -> {:?}", key, value);
        Ok(value)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| anyhow::anyhow!("settings lock poisoned: {}", e))?;
        let mut settings = self.load_all()?;
        settings.insert(key.to_string(), value);
        self.save_all(&settings)
    }
}
