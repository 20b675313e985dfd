use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Storage file name in the cache directory
const STORAGE_FILE: &str = "session.json";

/// Well-known keys shared by the session store, the API client, and the
/// navigation guard.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
}

/// String key-value store persisted as one JSON object on disk.
///
/// Every read goes back to the file, so a value written by one component
/// is visible to every other component and to later process runs. A
/// missing file is an empty store, not an error.
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Read the current value for a key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    /// Write a value, replacing any previous value for the key
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    /// Remove a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let path = self.storage_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents =
            std::fs::read_to_string(&path).context("Failed to read session storage file")?;
        serde_json::from_str(&contents).context("Failed to parse session storage file")
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let path = self.storage_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(path, contents).context("Failed to write session storage file")?;
        Ok(())
    }

    fn storage_path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn test_dir() -> PathBuf {
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "minijira-storage-test-{}-{}",
            std::process::id(),
            seq
        ))
    }

    #[test]
    fn test_get_on_missing_file_is_none() {
        let storage = Storage::new(test_dir());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let storage = Storage::new(test_dir());
        storage.set(keys::TOKEN, "abc123").unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("abc123"));

        // Overwrite
        storage.set(keys::TOKEN, "def456").unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("def456"));
    }

    #[test]
    fn test_keys_are_independent() {
        let storage = Storage::new(test_dir());
        storage.set(keys::USERNAME, "carol").unwrap();
        storage.set(keys::EMAIL, "carol@example.com").unwrap();

        assert_eq!(storage.get(keys::USERNAME).unwrap().as_deref(), Some("carol"));
        assert_eq!(
            storage.get(keys::EMAIL).unwrap().as_deref(),
            Some("carol@example.com")
        );
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let storage = Storage::new(test_dir());
        storage.set(keys::TOKEN, "abc123").unwrap();

        storage.remove(keys::TOKEN).unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);

        // Removing again succeeds
        storage.remove(keys::TOKEN).unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = test_dir();
        Storage::new(dir.clone()).set(keys::TOKEN, "abc123").unwrap();

        let reopened = Storage::new(dir);
        assert_eq!(reopened.get(keys::TOKEN).unwrap().as_deref(), Some("abc123"));
    }
}
