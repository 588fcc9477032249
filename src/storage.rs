use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    light_state::{PersistedLight, User},
};

pub const LIGHT_KEY: &str = "light_it_up_state";
pub const USER_KEY: &str = "light_it_up_user";

/// String keys to string values, nothing else. Writes are fire-and-forget.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

pub fn storage_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("light-it-up")
        .join("storage.toml")
}

/// Flat TOML table on disk, rewritten whole on every change.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: PathBuf) -> Self {
        let entries = match Self::read_entries(&path) {
            Ok(Some(entries)) => {
                log::info!(
                    "[storage] loaded {} entries from {}",
                    entries.len(),
                    path.display()
                );
                entries
            }
            Ok(None) => {
                log::info!("[storage] no storage file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(error) => {
                log::warn!("[storage] {error}, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<Option<BTreeMap<String, String>>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::StorageIo {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| Error::StorageParse {
                path: path.to_path_buf(),
                source,
            })
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::StorageIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content).map_err(|source| Error::StorageIo {
            path: self.path.clone(),
            source,
        })
    }

    fn flush_or_warn(&self) {
        if let Err(error) = self.flush() {
            log::warn!("[storage] {error}");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush_or_warn();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush_or_warn();
        }
    }
}

/// Typed access to the two entries the app keeps.
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str::<User>(&raw) {
            Ok(user) if !user.username.is_empty() => Some(user),
            Ok(_) => {
                log::warn!("[storage] ignoring saved user with empty username");
                None
            }
            Err(error) => {
                log::warn!("[storage] ignoring malformed saved user: {error}");
                None
            }
        }
    }

    pub fn load_light(&self) -> Option<PersistedLight> {
        let raw = self.store.get(LIGHT_KEY)?;
        let light = PersistedLight::parse(&raw);
        if light.is_none() {
            log::warn!("[storage] ignoring unknown light flag {raw:?}");
        }
        light
    }

    pub fn save_user(&mut self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.store.set(USER_KEY, &json),
            Err(error) => log::warn!("[storage] failed to serialize user: {error}"),
        }
    }

    pub fn save_light(&mut self, light: PersistedLight) {
        self.store.set(LIGHT_KEY, light.as_str());
    }

    pub fn clear(&mut self) {
        self.store.remove(USER_KEY);
        self.store.remove(LIGHT_KEY);
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;

    use super::KeyValueStore;

    #[derive(Default)]
    pub struct MemoryStore {
        pub entries: HashMap<String, String>,
        pub writes: usize,
    }

    impl MemoryStore {
        pub fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
                writes: 0,
            }
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) {
            self.writes += 1;
            self.entries.insert(key.to_string(), value.to_string());
        }

        fn remove(&mut self, key: &str) {
            self.writes += 1;
            self.entries.remove(key);
        }
    }
}
