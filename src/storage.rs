use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::AcResult;

pub const USER_KEY: &str = "ac_user";
pub const PREFERENCES_KEY: &str = "ac_prefs";
pub const FREQUENT_DESTINATIONS_KEY: &str = "frequent_destinations";

pub const STORE_FILE_NAME: &str = "local_storage.json";

/// String key/value store with the same contract as browser `localStorage`.
/// Writes are synchronous: every `set_item` rewrites the backing file.
#[derive(Debug, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    items: Mutex<FxHashMap<String, String>>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store file inside `data_dir`. A missing file is an empty store,
    /// an unreadable one is logged and treated as empty.
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(STORE_FILE_NAME);
        let items = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::error!("Ignoring corrupt local store {}: {e}", path.display());
                FxHashMap::default()
            }),
            Err(_) => FxHashMap::default(),
        };

        log::debug!("Local store {} opened with {} keys", path.display(), items.len());

        Self {
            path: Some(path),
            items: Mutex::new(items),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FxHashMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) -> AcResult<()> {
        let mut items = self.lock();
        items.insert(key.to_string(), value.into());
        self.flush(&items)
    }

    pub fn remove_item(&self, key: &str) -> AcResult<()> {
        let mut items = self.lock();
        if items.remove(key).is_some() {
            self.flush(&items)?;
        }
        Ok(())
    }

    /// Reads a JSON value, treating absence and parse failures alike.
    pub fn get_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        serde_json::from_str(&raw)
            .inspect_err(|e| log::warn!("Stored value under {key} is not valid JSON: {e}"))
            .ok()
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> AcResult<()> {
        self.set_item(key, serde_json::to_string(value)?)
    }

    /// Reads, modifies and writes back the JSON value under `key` while holding
    /// the store lock, so concurrent updates of the same key cannot drop each
    /// other's changes. A missing value starts from `T::default()`. A value that
    /// does not parse is an error and is left untouched.
    pub fn update_json<T, R>(&self, key: &str, update: impl FnOnce(&mut T) -> R) -> AcResult<R>
    where
        T: Serialize + for<'de> Deserialize<'de> + Default,
    {
        let mut items = self.lock();
        let mut value = match items.get(key) {
            Some(raw) => serde_json::from_str(raw).inspect_err(|e| {
                log::error!("Refusing to overwrite invalid JSON under {key}: {e}")
            })?,
            None => T::default(),
        };

        let result = update(&mut value);
        items.insert(key.to_string(), serde_json::to_string(&value)?);
        self.flush(&items)?;
        Ok(result)
    }

    // Writes are small and synchronous; async callers run them on the blocking pool.
    fn flush(&self, items: &FxHashMap<String, String>) -> AcResult<()> {
        if let Some(path) = &self.path {
            fs::write(path, serde_json::to_string_pretty(items)?)?;
        }
        Ok(())
    }

    pub fn user(&self) -> Option<StoredUser> {
        self.get_json(USER_KEY)
    }

    pub fn sign_in(&self, user: &StoredUser) -> AcResult<()> {
        self.set_json(USER_KEY, user)
    }

    pub fn sign_out(&self) -> AcResult<()> {
        self.remove_item(USER_KEY)
    }
}

/// What the login flow leaves under `ac_user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub user_id: i64,
    #[serde(default)]
    pub email: Option<String>,
}
