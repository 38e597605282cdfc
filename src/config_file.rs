//! Application configuration file.
//!
//! The CLI reads its settings from an optional JSON file passed with
//! `--config`. Every field has a default, so a partial file (or no file at
//! all) is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::storage::FileStore;

/// Settings for the command-line front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin and path shareable URLs are built on
    pub base_url: String,
    /// Directory saved configurations are written to
    pub storage_dir: PathBuf,
    /// Optional JSON catalog replacing the built-in products
    pub catalog: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            storage_dir: PathBuf::from(".fc-configurator"),
            catalog: None,
        }
    }
}

impl AppConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            anyhow::bail!("Base URL must be specified");
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            anyhow::bail!("Base URL must start with http:// or https://");
        }
        url::Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        if base_url.contains('#') || base_url.contains('?') {
            anyhow::bail!("Base URL must not contain a fragment or query");
        }

        if self.storage_dir.as_os_str().is_empty() {
            anyhow::bail!("Storage directory must be specified");
        }

        if let Some(catalog) = &self.catalog {
            if !catalog.is_file() {
                anyhow::bail!("Catalog file not found: {:?}", catalog);
            }
        }

        Ok(())
    }

    /// The catalog these settings select
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::load_from_file(path)
                .with_context(|| format!("Failed to load catalog from {:?}", path)),
            None => Ok(Catalog::builtin()),
        }
    }

    /// The store saved configurations go to
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.storage_dir)
    }
}
