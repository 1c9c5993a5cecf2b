//! Key-value settings stores that hold persisted profile overrides.
//!
//! [`FileStore`] keeps values in memory and writes them to a JSON file on
//! [`FileStore::save`]. The default file lives in the user config directory,
//! e.g. `~/.config/checkprofile/settings.json`.

use directories::ProjectDirs;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Value returned for a key that has neither a stored value nor a default.
pub const UNSET: &str = "";

/// String settings with per-key defaults.
pub trait SettingsStore {
    /// Current value, the key's default, or [`UNSET`].
    fn get_string(&self, key: &str) -> String;

    fn set_string(&mut self, key: &str, value: &str);

    /// Drop the stored value so the key reads as its default again.
    fn reset_to_default(&mut self, key: &str);
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    defaults: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in default for a key.
    pub fn with_default(mut self, key: &str, value: &str) -> Self {
        self.defaults.insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingsStore for MemoryStore {
    fn get_string(&self, key: &str) -> String {
        self.values
            .get(key)
            .or_else(|| self.defaults.get(key))
            .cloned()
            .unwrap_or_else(|| UNSET.to_string())
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn reset_to_default(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Store persisted as a flat JSON object.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Default settings file in the user config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "checkprofile").map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Open the store at `path`. A missing file yields an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut inner = MemoryStore::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                inner.values = serde_json::from_str(&content).map_err(|e| {
                    anyhow::anyhow!("invalid settings file {}: {}", path.display(), e)
                })?;
            }
        }

        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all stored values to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.inner.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get_string(&self, key: &str) -> String {
        self.inner.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.inner.set_string(key, value);
    }

    fn reset_to_default(&mut self, key: &str) {
        self.inner.reset_to_default(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_defaults() {
        let mut store = MemoryStore::new().with_default("problems", "x=true;error!");
        assert_eq!(store.get_string("problems"), "x=true;error!");
        assert_eq!(store.get_string("other"), UNSET);

        store.set_string("problems", "y=false;style!");
        assert_eq!(store.get_string("problems"), "y=false;style!");

        store.reset_to_default("problems");
        assert_eq!(store.get_string("problems"), "x=true;error!");
    }

    #[test]
    fn test_file_store_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("settings.json");

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get_string("problems"), UNSET);
        store.set_string("problems", "nullPointer=false;warning!");
        store.save().unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_string("problems"), "nullPointer=false;warning!");
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(FileStore::open(&path).is_err());
    }
}
