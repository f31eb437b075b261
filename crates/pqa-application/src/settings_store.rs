//! User settings persistence.
//!
//! [`SettingsRepository`] is the plain load/save pair; [`SettingsStore`] keeps
//! the merged settings as live state the UI can bind to and persists only when
//! asked.

use crate::readiness::Readiness;
use pqa_core::config::SETTINGS_KEY;
use pqa_core::error::Result;
use pqa_core::settings::{SettingValue, Settings};
use pqa_core::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::watch;

/// Loads and saves settings under a fixed key of a key-value store.
#[derive(Clone)]
pub struct SettingsRepository {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl SettingsRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    /// Repository using the standard `userSettings` key.
    pub fn with_default_key(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::new(kv, SETTINGS_KEY)
    }

    /// Returns persisted settings merged over the defaults.
    ///
    /// A missing key (first run) yields exactly the defaults.
    pub async fn load(&self) -> Result<Settings> {
        let persisted = match self.kv.get(&self.key).await? {
            Some(value) => Settings::from_json(&value),
            None => Settings::new(),
        };
        Ok(Settings::merged_over_defaults(&persisted))
    }

    /// Writes the full mapping; keys missing from `settings` are not kept.
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        self.kv.set(&self.key, settings.to_json()).await
    }
}

/// Live settings state with explicit persistence.
///
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct SettingsStore {
    repository: SettingsRepository,
    state: Arc<watch::Sender<Settings>>,
}

impl SettingsStore {
    /// Creates a store holding the defaults and starts loading persisted
    /// settings in the background.
    ///
    /// Must be called inside a tokio runtime. Changes made before the returned
    /// [`Readiness`] resolves are replaced by the loaded settings.
    pub fn spawn(repository: SettingsRepository) -> (Self, Readiness) {
        let (sender, _) = watch::channel(Settings::defaults());
        let store = Self {
            repository,
            state: Arc::new(sender),
        };

        let loader = store.clone();
        let handle = tokio::spawn(async move {
            match loader.repository.load().await {
                Ok(settings) => {
                    tracing::info!("[SettingsStore] Loaded {} setting(s)", settings.len());
                    loader.state.send_replace(settings);
                }
                Err(e) => {
                    tracing::error!("[SettingsStore] Failed to initialize store: {}", e);
                }
            }
        });

        (store, Readiness::new(handle))
    }

    /// Creates the store and waits for the initial load.
    pub async fn open(repository: SettingsRepository) -> Self {
        let (store, ready) = Self::spawn(repository);
        ready.wait().await;
        store
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.state.borrow().clone()
    }

    pub fn get(&self, key: &str) -> Option<SettingValue> {
        self.state.borrow().get(key).cloned()
    }

    /// Changes one value in memory. Call [`SettingsStore::save`] to persist.
    pub fn set(&self, key: impl Into<String>, value: impl Into<SettingValue>) {
        let key = key.into();
        let value = value.into();
        self.state.send_modify(|settings| {
            settings.set(key, value);
        });
    }

    /// Applies an arbitrary in-memory edit.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        self.state.send_modify(f);
    }

    /// Replaces the whole mapping in memory.
    pub fn replace(&self, settings: Settings) {
        self.state.send_replace(settings);
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.state.subscribe()
    }

    /// Persists the current live settings.
    ///
    /// Failures are logged and swallowed; the in-memory state stays
    /// authoritative.
    pub async fn save(&self) {
        let snapshot = self.settings();
        if let Err(e) = self.repository.save(&snapshot).await {
            tracing::error!("[SettingsStore] Failed to save settings: {}", e);
        }
    }
}
