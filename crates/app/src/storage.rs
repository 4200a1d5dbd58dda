//! Local key/value storage.
//!
//! Stands in for the browser's local storage: string values under string
//! keys, read and written synchronously. Implementations serialise access
//! themselves, so concurrent writers resolve last-write-wins.

use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Key holding the persisted cart.
pub const CART_KEY: &str = "agroverse_cart";

/// Key holding the saved checkout form.
pub const CHECKOUT_INFO_KEY: &str = "agroverse_checkout_info";

/// Key holding the order history list.
pub const ORDER_HISTORY_KEY: &str = "agroverse_order_history";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing {key} ({needed} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("storage io error for {key}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse stored value for {key}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize value for {key}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key/value store.
pub trait Storage: Debug + Send + Sync {
    /// Read the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and parse a JSON value.
///
/// # Errors
///
/// Returns an error when the value cannot be read or is not valid JSON for `T`.
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Parse {
            key: key.to_string(),
            source,
        })
}

/// Serialize and write a JSON value.
///
/// # Errors
///
/// Returns an error when serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;

    storage.set(key, &raw)
}

/// In-process storage, optionally limited to a total number of bytes.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<FxHashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Unlimited storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys and values exceed `bytes` in total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: Mutex::default(),
            quota: Some(bytes),
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.quota {
            let others: usize = values
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();

            let needed = others + key.len() + value.len();

            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        values.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        Ok(())
    }
}

/// Storage backed by one `<key>.json` file per key in a directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Use `dir`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;

        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str, source: io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(key, error)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = self.path(key);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value).map_err(|error| io_error(key, error))?;
        fs::rename(&staging, &path).map_err(|error| io_error(key, error))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(key, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[test]
    fn memory_storage_round_trips_values() -> TestResult {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get("k")?, None);

        storage.set("k", "v")?;
        assert_eq!(storage.get("k")?.as_deref(), Some("v"));

        storage.remove("k")?;
        storage.remove("k")?;
        assert_eq!(storage.get("k")?, None);

        Ok(())
    }

    #[test]
    fn memory_quota_rejects_oversized_writes() -> TestResult {
        let storage = MemoryStorage::with_quota(8);

        storage.set("k", "1234")?;
        storage.set("k", "123456")?;

        let result = storage.set("other", "1");

        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert_eq!(storage.get("k")?.as_deref(), Some("123456"));

        Ok(())
    }

    #[test]
    fn json_helpers_report_parse_failures() -> TestResult {
        let storage = MemoryStorage::new();

        write_json(&storage, "note", &Note { text: "hi".into() })?;
        assert_eq!(
            read_json::<Note>(&storage, "note")?,
            Some(Note { text: "hi".into() })
        );

        storage.set("note", "{not json")?;
        assert!(matches!(
            read_json::<Note>(&storage, "note"),
            Err(StorageError::Parse { .. })
        ));

        Ok(())
    }

    #[test]
    fn file_storage_persists_across_instances() -> TestResult {
        let dir = tempfile::tempdir()?;

        FileStorage::open(dir.path())?.set(CART_KEY, "{}")?;

        let reopened = FileStorage::open(dir.path())?;

        assert_eq!(reopened.get(CART_KEY)?.as_deref(), Some("{}"));

        reopened.remove(CART_KEY)?;
        reopened.remove(CART_KEY)?;

        assert_eq!(reopened.get(CART_KEY)?, None);

        Ok(())
    }
}
