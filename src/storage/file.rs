//! File-backed store

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{KeyValueStore, StorageError};

/// Store that keeps one `<key>.json` file per key in a directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// reader never sees a partially written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    /// Directory holding the stored files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn values_survive_reopening() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut store = FileStore::open(dir.path())?;
        store.set("cart-storage", r#"{"version":1}"#)?;

        let reopened = FileStore::open(dir.path())?;

        assert_eq!(
            reopened.get("cart-storage")?.as_deref(),
            Some(r#"{"version":1}"#)
        );
        assert!(dir.path().join("cart-storage.json").exists());

        Ok(())
    }

    #[test]
    fn missing_key_is_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileStore::open(dir.path())?;

        assert_eq!(store.get("orders")?, None);

        Ok(())
    }

    #[test]
    fn open_creates_nested_directory() -> TestResult {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");

        let store = FileStore::open(&nested)?;

        assert!(store.dir().is_dir());

        Ok(())
    }

    #[test]
    fn keys_with_path_separators_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = FileStore::open(dir.path())?;

        let result = store.set("../escape", "x");

        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "expected InvalidKey, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn remove_deletes_the_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = FileStore::open(dir.path())?;
        store.set("orders", "[]")?;

        store.remove("orders")?;
        store.remove("orders")?;

        assert_eq!(store.get("orders")?, None);

        Ok(())
    }
}
