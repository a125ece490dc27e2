//! Persisted app settings: the API key and the first-visit flag.

use ct_store::SettingsStore;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

pub const KEY_API_KEY: &str = "storage_apikey";
pub const KEY_FIRST_VISIT: &str = "storage_isFirstVisit";

pub struct Settings {
    store: SettingsStore,
}

impl Settings {
    /// Open the store under `~/.chatgptranslate/settings.json`.
    pub fn open_default() -> anyhow::Result<Self> {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME is not set"))?;
        Ok(Self::open(
            PathBuf::from(home)
                .join(".chatgptranslate")
                .join("settings.json"),
        ))
    }

    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            store: SettingsStore::open(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Restore defaults: empty API key, first-visit set.
    pub fn reset(&self) {
        let mut defaults = Map::new();
        defaults.insert(KEY_FIRST_VISIT.to_string(), json!(true));
        defaults.insert(KEY_API_KEY.to_string(), json!(""));
        self.store.set(&defaults);
    }

    pub fn api_key(&self) -> Option<String> {
        self.store
            .get(Some(&[KEY_API_KEY]))
            .get(KEY_API_KEY)
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    pub fn set_api_key(&self, key: &str) {
        let mut entries = Map::new();
        entries.insert(KEY_API_KEY.to_string(), json!(key));
        self.store.set(&entries);
    }

    /// A missing or malformed flag counts as a first visit.
    pub fn is_first_visit(&self) -> bool {
        self.store
            .get(Some(&[KEY_FIRST_VISIT]))
            .get(KEY_FIRST_VISIT)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    pub fn mark_visited(&self) {
        let mut entries = Map::new();
        entries.insert(KEY_FIRST_VISIT.to_string(), json!(false));
        self.store.set(&entries);
    }
}
