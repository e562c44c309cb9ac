//! File-backed key-value storage.
//!
//! The desktop stand-in for the browser's localStorage: a JSON map at
//! the platform config path, with an in-memory cache in front. This
//! holds preferences (per-spell dice configs, the active sheet tab), so
//! write failures are logged and swallowed rather than surfaced.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use directories::ProjectDirs;

use crate::ports::StorageProvider;

pub struct FileStorage {
    storage_path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create) the store at the platform config location, e.g.
    /// `~/.config/vellum/player/storage.json` on Linux.
    pub fn desktop() -> Self {
        let path = ProjectDirs::from("io", "vellum", "player")
            .map(|dirs| dirs.config_dir().join("storage.json"))
            .unwrap_or_else(|| PathBuf::from("vellum-storage.json"));
        Self::open(path)
    }

    pub fn open(storage_path: PathBuf) -> Self {
        let cache = fs::read_to_string(&storage_path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            storage_path,
            cache: RwLock::new(cache),
        }
    }

    fn persist(&self) {
        let cache = match self.cache.read() {
            Ok(cache) => cache.clone(),
            Err(_) => return,
        };
        if let Some(parent) = self.storage_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!("storage dir create failed: {e}");
                return;
            }
        }
        let raw = match serde_json::to_string_pretty(&cache) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("storage serialize failed: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.storage_path, raw) {
            tracing::warn!("storage write failed: {e}");
        }
    }
}

impl StorageProvider for FileStorage {
    fn save(&self, key: &str, value: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.to_string(), value.to_string());
        }
        self.persist();
    }

    fn load(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn remove(&self, key: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(key);
        }
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json"));

        storage.save("sheet_active_tab", "combat");
        assert_eq!(storage.load("sheet_active_tab").as_deref(), Some("combat"));

        storage.remove("sheet_active_tab");
        assert!(storage.load("sheet_active_tab").is_none());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        FileStorage::open(path.clone()).save("k", "v");
        let reopened = FileStorage::open(path);
        assert_eq!(reopened.load("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nope.json"));
        assert!(storage.load("anything").is_none());
    }
}
