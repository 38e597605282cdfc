//! Local key-value persistence for configurations.
//!
//! Each saved configuration is one JSON blob stored under
//! `fc_config_<uuid>`. The store is a trait so the configurator can run
//! against memory in tests and against a directory of files from the CLI.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::configuration::Configuration;
use crate::error::{ConfiguratorError, Result};

/// Prefix of every configuration key
pub const STORAGE_KEY_PREFIX: &str = "fc_config_";

/// Key a configuration is stored under
pub fn storage_key(id: &Uuid) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, id)
}

/// A string-to-string store, one entry per key.
pub trait KeyValueStore {
    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// All keys, sorted
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Directory-backed store: one `<key>.json` file per entry.
///
/// The directory is created on the first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ConfiguratorError::storage(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Result of saving the current configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { config_id: Uuid },
    Failed { error: String },
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn config_id(&self) -> Option<Uuid> {
        match self {
            Self::Saved { config_id } => Some(*config_id),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Saved { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// Ids of all configurations in a store, ignoring unrelated keys
pub fn saved_configuration_ids(store: &dyn KeyValueStore) -> Result<Vec<Uuid>> {
    Ok(store
        .keys()?
        .iter()
        .filter_map(|key| key.strip_prefix(STORAGE_KEY_PREFIX))
        .filter_map(|id| Uuid::parse_str(id).ok())
        .collect())
}

/// Read back a stored configuration blob
pub fn read_saved_configuration(
    store: &dyn KeyValueStore,
    id: &Uuid,
) -> Result<Option<Configuration>> {
    store
        .get(&storage_key(id))?
        .map(|json| Configuration::from_json(&json).map_err(ConfiguratorError::from))
        .transpose()
}
