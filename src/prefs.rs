//! User preferences that survive restarts (currently just the sound toggle)

use crate::error::PreferencesError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub sound_enabled: bool,
}

/// Key-value backing for preferences
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load(&self) -> Result<Preferences, PreferencesError>;
    async fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError>;
}

/// Load preferences, falling back to defaults if the store is unavailable
pub async fn load_or_default(store: &dyn PreferenceStore) -> Preferences {
    match store.load().await {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!("Failed to load preferences, using defaults: {}", e);
            Preferences::default()
        }
    }
}

/// Preferences stored as a small JSON document
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn load(&self) -> Result<Preferences, PreferencesError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    async fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let json = serde_json::to_string_pretty(prefs)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

/// In-process store, for tests and embedders without persistence
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            inner: Mutex::new(prefs),
        }
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self) -> Result<Preferences, PreferencesError> {
        Ok(self
            .inner
            .lock()
            .map(|p| p.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone()))
    }

    async fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        match self.inner.lock() {
            Ok(mut guard) => *guard = prefs.clone(),
            Err(poisoned) => *poisoned.into_inner() = prefs.clone(),
        }
        Ok(())
    }
}
