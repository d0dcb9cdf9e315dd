//! JSON file storage backend.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::Storage;
use crate::error::StorageError;

/// Storage persisted as a single JSON object of string values.
///
/// The whole file is loaded by [`FileStorage::open`] and rewritten on every
/// `set`/`remove` through a temporary file and a rename, so a crash never
/// leaves a half-written file behind. The in-memory copy only changes once
/// the file write succeeded.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the storage file at `path`.
    ///
    /// A missing file is treated as empty storage; it is created on the first
    /// write, along with its parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be read, or
    /// [`StorageError::Corrupt`] if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened session storage file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the storage file at `path`, setting a corrupt file aside.
    ///
    /// A file that is not a JSON object of strings is renamed to
    /// `<name>.corrupt` and the storage starts empty, so a damaged file never
    /// locks the customer out of logging out or back in.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be read or moved.
    pub fn open_or_recover(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        match Self::open(path.clone()) {
            Err(StorageError::Corrupt(err)) => {
                let backup = sibling_path(&path, ".corrupt");
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %err,
                    "Session storage file is corrupt, starting empty"
                );
                fs::rename(&path, &backup)?;
                Ok(Self {
                    path,
                    entries: Mutex::new(BTreeMap::new()),
                })
            }
            other => other,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let temp = sibling_path(&self.path, ".tmp");
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_owned(), value.to_owned());
        self.write_file(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.write_file(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("session.json")).unwrap();
        assert_eq!(storage.get("accessToken").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set("accessToken", "tok").unwrap();
        storage.set("cartId", "gid://cart/9").unwrap();
        storage.remove("cartId").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("accessToken").unwrap().as_deref(), Some("tok"));
        assert_eq!(reopened.get("cartId").unwrap(), None);
        assert!(!path.with_file_name("session.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_recover_sets_corrupt_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open_or_recover(&path).unwrap();
        assert_eq!(storage.get("accessToken").unwrap(), None);
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("session.json.corrupt")).unwrap(),
            "not json"
        );

        storage.set("accessToken", "tok").unwrap();
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("accessToken").unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn test_recover_keeps_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"cartId": "gid://cart/1"}"#).unwrap();

        let storage = FileStorage::open_or_recover(&path).unwrap();
        assert_eq!(storage.get("cartId").unwrap().as_deref(), Some("gid://cart/1"));
        assert!(!dir.path().join("session.json.corrupt").exists());
    }

    #[test]
    fn test_empty_file_is_empty_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("customer").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_key_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.remove("cartId").unwrap();
        assert!(!path.exists());
    }
}
