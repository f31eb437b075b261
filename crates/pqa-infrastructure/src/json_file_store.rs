//! JSON file key-value store.
//!
//! Each store file is a single JSON object whose top-level keys are the
//! store keys (`userSettings`, `history`). Every `set` is flushed to disk
//! immediately.

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use pqa_core::error::{PqaError, Result};
use pqa_core::storage::KeyValueStore;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

type Document = Map<String, Value>;

/// Key-value store persisted as one JSON document.
///
/// The document is cached after the first read; writes go through a locked
/// read-modify-write on the file, then refresh the cache.
///
/// # Example
///
/// ```ignore
/// use pqa_infrastructure::JsonFileStore;
///
/// let store = JsonFileStore::new(paths.settings_file(&config));
/// store.set("userSettings", serde_json::json!({"llm": "gpt-4o"})).await?;
/// ```
#[derive(Clone)]
pub struct JsonFileStore {
    file: Arc<AtomicJsonFile<Document>>,
    /// `None` until the file has been read once.
    cache: Arc<Mutex<Option<Document>>>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the document from disk in a blocking context.
    async fn read_document(&self) -> Result<Document> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| PqaError::internal(format!("Failed to join task: {}", e)))??;
        Ok(loaded.unwrap_or_default())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            let document = self.read_document().await?;
            tracing::debug!(
                "[JsonFileStore] Loaded {} key(s) from {:?}",
                document.len(),
                self.path()
            );
            *cache = Some(document);
        }

        Ok(cache.as_ref().and_then(|doc| doc.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut cache = self.cache.lock().await;

        let file = self.file.clone();
        let key_owned = key.to_string();
        let written = tokio::task::spawn_blocking(move || {
            file.update(Document::new(), |doc| {
                doc.insert(key_owned, value);
            })
        })
        .await
        .map_err(|e| PqaError::internal(format!("Failed to join task: {}", e)))??;

        *cache = Some(written);
        tracing::debug!("[JsonFileStore] Saved '{}' to {:?}", key, self.path());
        Ok(())
    }
}
