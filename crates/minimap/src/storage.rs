// Chunk: docs/chunks/minimap_settings - Key-value storage for settings
//!
//! String key-value storage behind the settings store and scroll cache.
//!
//! Storage is an outside-the-process concern: a browser host maps it onto
//! `localStorage`, natively it is a JSON file under the platform config
//! directory. Every operation is fallible and every caller degrades to
//! "no persistence" on error.
//!
//! ## File Location
//!
//! [`JsonFileStorage::default_path`] resolves to
//! `<config dir>/lite-notebook/storage.json`, e.g.
//! `~/.config/lite-notebook/storage.json` on Linux.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

/// Application name used for the config directory.
const APP_NAME: &str = "lite-notebook";

/// Storage file name.
const STORAGE_FILENAME: &str = "storage.json";

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be used at all (no config dir, disabled storage)
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage i/o: {0}")]
    Io(#[from] io::Error),
    #[error("storage file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key-value store.
///
/// Methods take `&self`: the store is shared between the settings store, the
/// scroll cache and possibly several list instances.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: Storage + ?Sized> Storage for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every operation with `Unavailable`, like a
    /// browser with storage disabled.
    pub fn unavailable() -> Self {
        Self {
            entries: RefCell::default(),
            unavailable: true,
        }
    }

    /// Creates a store pre-filled with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RefCell::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            unavailable: false,
        }
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// =============================================================================
// JsonFileStorage
// =============================================================================

/// Storage persisted as one JSON object of string values.
///
/// Entries are cached in memory; every write rewrites the file atomically
/// (temp file, then rename). [`JsonFileStorage::reload`] re-reads the file
/// after another process changed it.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// Returns the default storage file path, or `None` if the platform has
    /// no config directory.
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(APP_NAME).join(STORAGE_FILENAME))
    }

    /// Opens the default storage file.
    pub fn open_default() -> Result<Self, StorageError> {
        let path = Self::default_path().ok_or(StorageError::Unavailable)?;
        Self::open(path)
    }

    /// Opens the storage file at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = read_entries(&path)?;
        debug!(path = %path.display(), entries = entries.len(), "opened storage file");
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file, replacing the cached entries.
    pub fn reload(&self) -> Result<(), StorageError> {
        let entries = read_entries(&self.path)?;
        *self.entries.borrow_mut() = entries;
        Ok(())
    }

    fn write(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&*self.entries.borrow())?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        self.write()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.entries.borrow_mut().remove(key).is_some() {
            self.write()?;
        }
        Ok(())
    }
}
