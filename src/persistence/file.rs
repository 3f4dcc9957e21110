//! Native file-backed store
//!
//! The whole store is one JSON object of string values, rewritten on every
//! `set` through a temp file and rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ScoreStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) if json.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every future write
        let mut values = self.load().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable store {}: {}", self.path.display(), e);
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("flappy-store-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("save.json")
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.get("flappyHighScore").unwrap(), None);
    }

    #[test]
    fn test_set_persists_across_instances() {
        let path = temp_path("persist");
        let mut store = FileStore::new(&path);
        store.set("flappyHighScore", "7").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("flappyHighScore").unwrap().as_deref(), Some("7"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_reports_then_recovers() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let mut store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(StoreError::Format(_))));

        store.set("k", "3").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("3"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
