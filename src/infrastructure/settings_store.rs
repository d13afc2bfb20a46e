// TOML-file backed key-value store for display preferences
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::application::ui_settings::SettingsStore;

/// Write-through store: the whole map is rewritten on every change.
/// Preference persistence is best-effort, so write failures are logged and
/// swallowed rather than propagated into the request path.
pub struct FileSettingsStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileSettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            toml::from_str(&fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let serialized = match toml::to_string(entries) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!("could not serialize settings: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, serialized) {
            tracing::warn!("could not persist settings to {}: {e}", self.path.display());
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        self.persist(&entries);
    }
}
