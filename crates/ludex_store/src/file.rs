//! File-based store backend for persistent storage.

use crate::error::{StoreError, StoreResult};
use crate::store::KeyValueStore;
use std::fs;
use std::path::{Path, PathBuf};

/// A file-based key-value store.
///
/// Each key maps to one file under a root directory; the file's contents
/// are the value. Entries survive process restarts.
///
/// # Keys
///
/// Keys become file names, so they are restricted to
/// `[A-Za-z0-9._-]` and must not start with a dot. The engine only uses
/// stringified numeric identifiers, which always satisfy this.
///
/// # Durability
///
/// Writes go to a temporary file in the same directory and are renamed
/// into place, so readers never observe a partially-written value.
///
/// # Example
///
/// ```no_run
/// use ludex_store::{FileStore, KeyValueStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("cache")).unwrap();
/// store.set("17", "{\"appid\":10}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a file store rooted at `root`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: &Path) -> StoreResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.entry_path(key)?;
        let tmp = self.root.join(format!(".{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                // Skip in-flight temporaries.
                if validate_key(name).is_ok() {
                    keys.push(name.to_string());
                }
            }
        }
        Ok(keys)
    }
}
