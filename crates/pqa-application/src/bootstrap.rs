//! Application-scope wiring of the client and the two stores.

use std::sync::Arc;

use anyhow::{Context, Result};
use pqa_client::RpcClient;
use pqa_core::config::StoreConfig;
use pqa_core::storage::KeyValueStore;
use pqa_core::transport::Transport;
use pqa_infrastructure::{JsonFileStore, PqaPaths};
use serde_json::{Map, Value};

use crate::history_store::HistoryStore;
use crate::settings_store::{SettingsRepository, SettingsStore};

/// Services shared across the UI for the lifetime of the application.
///
/// Built once at startup and handed to whatever needs it; the client inside
/// is the only owner of the connection state.
#[derive(Clone)]
pub struct AppServices {
    pub client: Arc<RpcClient>,
    pub settings: SettingsStore,
    pub history: HistoryStore,
}

impl AppServices {
    /// Opens the JSON store files under `paths` and wires them to `transport`.
    ///
    /// Both stores are fully loaded when this returns. Nothing is sent to the
    /// server; the client connects on its first request.
    pub async fn bootstrap(
        transport: Arc<dyn Transport>,
        paths: &PqaPaths,
        config: &StoreConfig,
    ) -> Result<Self> {
        let settings_path = paths
            .settings_file(config)
            .context("Failed to resolve settings file path")?;
        let history_path = paths
            .history_file(config)
            .context("Failed to resolve history file path")?;

        tracing::info!("[Bootstrap] Settings file: {:?}", settings_path);
        tracing::info!("[Bootstrap] History file: {:?}", history_path);

        let settings_kv: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(settings_path));
        let history_kv: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(history_path));

        Ok(Self::with_stores(transport, settings_kv, history_kv, config).await)
    }

    /// Wires the services over caller-provided key-value stores.
    pub async fn with_stores(
        transport: Arc<dyn Transport>,
        settings_kv: Arc<dyn KeyValueStore>,
        history_kv: Arc<dyn KeyValueStore>,
        config: &StoreConfig,
    ) -> Self {
        let repository = SettingsRepository::new(settings_kv, config.settings_key.clone());
        let (settings, settings_ready) = SettingsStore::spawn(repository);
        let (history, history_ready) = HistoryStore::spawn(history_kv, config.history_key.clone());

        settings_ready.wait().await;
        history_ready.wait().await;

        Self {
            client: Arc::new(RpcClient::new(transport)),
            settings,
            history,
        }
    }

    /// Initializes the server with the current settings.
    ///
    /// `paper_dir` comes from the settings, and the full settings mapping is
    /// sent as options.
    pub async fn initialize_server(&self) -> pqa_core::Result<Value> {
        let settings = self.settings.settings();
        let paper_dir = settings.text("paper_dir").unwrap_or_default().to_string();
        self.client.initialize(&paper_dir, &settings).await
    }

    /// Persists the live settings and pushes them to the server.
    pub async fn apply_settings(&self) -> pqa_core::Result<Value> {
        self.settings.save().await;
        let settings = self.settings.settings();
        self.client.update_settings(&settings).await
    }

    /// Asks a question and records the exchange in the history.
    ///
    /// The RPC error, if any, is returned and nothing is recorded. The
    /// recorded entry holds the question plus every field of the reply object.
    pub async fn ask_and_record(&self, question: &str) -> pqa_core::Result<Value> {
        let reply = self.client.ask(question).await?;

        let mut record = Map::new();
        record.insert("question".to_string(), Value::from(question));
        match &reply {
            Value::Object(fields) => {
                for (key, value) in fields {
                    record.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
            other => {
                record.insert("answer".to_string(), other.clone());
            }
        }
        self.history.add_entry(record).await;

        Ok(reply)
    }

    /// Closes the server connection; call on application exit.
    pub async fn shutdown(&self) {
        if let Err(e) = self.client.close().await {
            tracing::warn!("[Bootstrap] Error while closing client: {}", e);
        }
    }
}
