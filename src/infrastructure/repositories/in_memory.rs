use crate::domain::ports::PreferenceStore;
use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local preference store, used by tests and `--ephemeral` runs.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    values: RwLock<HashMap<String, Value>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            ),
        }
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let values = self
            .values
            .read()
            .map_err(|e| anyhow::anyhow!("preference store lock poisoned: {}", e))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| anyhow::anyhow!("preference store lock poisoned: {}", e))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}
