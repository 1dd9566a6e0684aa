//! Key/value persistence for `get_data` / `set_data`.
//!
//! Values are opaque JSON strings; the engine does the (de)serialization.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub trait Storage {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&mut self, key: &str, value: String) -> Result<()>;
}

/// In-process storage; the default when the host provides none.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// One `<key>.json` file per entry in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it if it doesn't exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    /// `<data dir>/<app>/data`, falling back to `./data`.
    pub fn for_app(app: &str) -> Result<Self> {
        let dir = dirs::data_dir()
            .map(|p| p.join(app).join("data"))
            .unwrap_or_else(|| PathBuf::from("./data"));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl Storage for FileStorage {
    fn get_raw(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<()> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_roundtrip() {
        let mut s = MemoryStorage::new();
        assert!(s.get_raw("hi").is_none());
        s.set_raw("hi", "3".into()).unwrap();
        assert_eq!(s.get_raw("hi").as_deref(), Some("3"));
    }

    #[test]
    fn file_storage_writes_one_file_per_key() {
        let dir = std::env::temp_dir().join(format!("kaboom-storage-{}", std::process::id()));
        let mut s = FileStorage::new(&dir).unwrap();
        s.set_raw("high/score", "{\"v\":10}".into()).unwrap();
        assert_eq!(s.get_raw("high/score").as_deref(), Some("{\"v\":10}"));
        assert!(dir.join("high_score.json").exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
