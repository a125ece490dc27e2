//! File-backed key-value settings store for ChatGPTranslate.
//!
//! One JSON object per store file. Operations are synchronous and
//! best-effort: a store that cannot be read or written is logged and treated
//! as empty rather than surfaced to the caller, since nothing persisted here
//! is critical to a single run.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Named JSON values persisted under a single file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write each entry. Existing keys are overwritten, other keys are left
    /// untouched.
    pub fn set(&self, entries: &Map<String, Value>) {
        let mut data = self.load();
        for (key, value) in entries {
            data.insert(key.clone(), value.clone());
        }
        self.save(&data);
    }

    /// Read the requested keys, or every entry when `keys` is `None`.
    /// Keys that are not present are warned about and omitted.
    pub fn get(&self, keys: Option<&[&str]>) -> Map<String, Value> {
        let data = self.load();
        let Some(keys) = keys else {
            return data;
        };

        let mut out = Map::new();
        for key in keys {
            match data.get(*key) {
                Some(value) => {
                    out.insert((*key).to_string(), value.clone());
                }
                None => {
                    tracing::warn!(key = %key, "key does not exist in the settings store");
                }
            }
        }
        out
    }

    /// Delete the named keys, or every entry when `keys` is `None`.
    pub fn remove(&self, keys: Option<&[&str]>) {
        let Some(keys) = keys else {
            self.save(&Map::new());
            return;
        };

        let mut data = self.load();
        for key in keys {
            if data.remove(*key).is_none() {
                tracing::warn!(key = %key, "key does not exist in the settings store");
            }
        }
        self.save(&data);
    }

    fn load(&self) -> Map<String, Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::error!(path = %self.path.display(), %e, "failed to read settings store");
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::error!(path = %self.path.display(), "settings store is not a JSON object");
                Map::new()
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), %e, "failed to parse settings store");
                Map::new()
            }
        }
    }

    fn save(&self, data: &Map<String, Value>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!(path = %self.path.display(), %e, "failed to create settings dir");
                return;
            }
        }
        let serialized = match serde_json::to_string_pretty(&Value::Object(data.clone())) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::error!(%e, "failed to serialize settings store");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, serialized) {
            tracing::error!(path = %self.path.display(), %e, "failed to write settings store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_store(name: &str) -> SettingsStore {
        SettingsStore::open(
            std::env::temp_dir().join(format!("ct-store-{name}-{}.json", Uuid::new_v4())),
        )
    }

    fn entries(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = temp_store("round-trip");
        store.set(&entries(&[
            ("k", json!("v")),
            ("n", json!(42)),
            ("b", json!(true)),
        ]));

        let read = store.get(Some(&["k", "n", "b"]));
        assert_eq!(read.get("k"), Some(&json!("v")));
        assert_eq!(read.get("n"), Some(&json!(42)));
        assert_eq!(read.get("b"), Some(&json!(true)));

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn missing_key_on_empty_store_is_omitted_without_panic() {
        let store = temp_store("missing");
        let read = store.get(Some(&["missing_key"]));
        assert!(read.is_empty());
    }

    #[test]
    fn get_without_keys_returns_everything() {
        let store = temp_store("get-all");
        store.set(&entries(&[("a", json!(1)), ("b", json!(2))]));

        let read = store.get(None);
        assert_eq!(read.len(), 2);

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn set_overwrites_without_clobbering_other_keys() {
        let store = temp_store("overwrite");
        store.set(&entries(&[("a", json!(1)), ("b", json!(2))]));
        store.set(&entries(&[("a", json!(3))]));

        let read = store.get(None);
        assert_eq!(read.get("a"), Some(&json!(3)));
        assert_eq!(read.get("b"), Some(&json!(2)));

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn remove_named_keys_and_clear_all() {
        let store = temp_store("remove");
        store.set(&entries(&[("a", json!(1)), ("b", json!(2))]));

        store.remove(Some(&["a", "not-there"]));
        let read = store.get(None);
        assert_eq!(read.len(), 1);
        assert!(read.contains_key("b"));

        store.remove(None);
        assert!(store.get(None).is_empty());

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn corrupt_store_file_reads_as_empty() {
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "not json at all").expect("write corrupt file");

        assert!(store.get(None).is_empty());

        // Still writable afterwards.
        store.set(&entries(&[("k", json!("v"))]));
        assert_eq!(store.get(Some(&["k"])).get("k"), Some(&json!("v")));

        let _ = std::fs::remove_file(store.path());
    }
}
