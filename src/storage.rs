use std::collections::BTreeMap;
use std::path::PathBuf;

/// String key-value storage behind drafts and the theme preference.
///
/// Reads miss instead of erroring and writes are best-effort, so callers
/// never have to thread storage failures through the UI.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Store backed by a single JSON object in the user's config directory.
///
/// Every mutation writes the file back; write debouncing happens upstream
/// in the draft layer, not here.
#[derive(Debug)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    const FILE: &'static str = "fitlog_storage.json";

    fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Loads the backing file, starting empty when it is missing or does
    /// not parse.
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    pub fn load_from(path: Option<PathBuf>) -> Self {
        let entries = path
            .as_deref()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::error!("Failed to write {}: {err}", path.display());
                }
            }
            Err(err) => log::error!("Failed to serialize storage: {err}"),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a", "1");
        store.set("a", "2");
        store.set("b", "x");
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 2);
        store.remove("a");
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b").as_deref(), Some("x"));
    }

    #[test]
    fn file_store_persists_across_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kv.json");

        let mut store = JsonFileStore::load_from(Some(path.clone()));
        store.set("fitlog_theme", "dark");
        drop(store);

        let reloaded = JsonFileStore::load_from(Some(path));
        assert_eq!(reloaded.get("fitlog_theme").as_deref(), Some("dark"));
    }

    #[test]
    fn file_store_tolerates_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kv.json");
        std::fs::write(&path, "not json at all").unwrap();

        let mut store = JsonFileStore::load_from(Some(path.clone()));
        assert_eq!(store.get("anything"), None);

        store.set("k", "v");
        let reloaded = JsonFileStore::load_from(Some(path));
        assert_eq!(reloaded.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn file_store_without_path_stays_in_memory() {
        let mut store = JsonFileStore::load_from(None);
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn remove_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kv.json");

        let mut store = JsonFileStore::load_from(Some(path.clone()));
        store.set("keep", "1");
        store.set("drop", "2");
        store.remove("drop");

        let reloaded = JsonFileStore::load_from(Some(path));
        assert_eq!(reloaded.get("keep").as_deref(), Some("1"));
        assert_eq!(reloaded.get("drop"), None);
    }
}
