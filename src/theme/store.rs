//! Durable key-value storage for user preferences.
//!
//! This is the shell's analog of the browser's per-origin local storage:
//! a small string map behind the [`PreferenceStore`] trait, with an
//! in-memory implementation for tests and a JSON file implementation
//! persisted under the platform config directory.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application name used for the preference directory path
const APP_NAME: &str = "gwadmpaw";

/// Preference file name
const PREFS_FILE: &str = "preferences.json";

/// Durable string key-value storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preference store persisted as a JSON map on disk.
/// Every write is flushed immediately; the file is small.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at the default platform location,
    /// e.g. `~/.config/gwadmpaw/preferences.json`.
    pub fn open_default() -> Result<Self> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Self::open(config_dir.join(APP_NAME).join(PREFS_FILE))
    }

    /// Open the store at an explicit path, loading existing values.
    pub fn open(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preference file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse preference file: {}", path.display()))?
        } else {
            HashMap::new()
        };
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

// ============================================================================
// Tests
// ============================================================================
