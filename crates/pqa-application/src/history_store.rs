//! Question/answer history persistence.

use crate::readiness::Readiness;
use pqa_core::config::HISTORY_KEY;
use pqa_core::history::{History, HistoryEntry};
use pqa_core::storage::KeyValueStore;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;

/// Newest-first interaction log, written through on every mutation.
///
/// The in-memory history is authoritative; persistence is best effort and its
/// failures are logged, never returned. Cloning shares the same state.
#[derive(Clone)]
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    state: Arc<watch::Sender<History>>,
}

impl HistoryStore {
    /// Creates an empty store and starts loading the persisted history.
    ///
    /// Must be called inside a tokio runtime. Mutations made before the
    /// returned [`Readiness`] resolves are replaced by the loaded history.
    pub fn spawn(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> (Self, Readiness) {
        let (sender, _) = watch::channel(History::new());
        let store = Self {
            kv,
            key: key.into(),
            state: Arc::new(sender),
        };

        let loader = store.clone();
        let handle = tokio::spawn(async move {
            match loader.kv.get(&loader.key).await {
                Ok(Some(value)) => {
                    let history = History::from_json(&value);
                    tracing::info!("[HistoryStore] Loaded {} history entries", history.len());
                    loader.state.send_replace(history);
                }
                Ok(None) => {
                    tracing::debug!("[HistoryStore] No history yet");
                }
                Err(e) => {
                    tracing::error!("[HistoryStore] Failed to load history: {}", e);
                }
            }
        });

        (store, Readiness::new(handle))
    }

    /// Creates the store under the standard `history` key and waits for the
    /// initial load.
    pub async fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::open_with_key(kv, HISTORY_KEY).await
    }

    pub async fn open_with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let (store, ready) = Self::spawn(kv, key);
        ready.wait().await;
        store
    }

    /// Snapshot of the history, newest first.
    pub fn history(&self) -> History {
        self.state.borrow().clone()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.state.borrow().entries().to_vec()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<History> {
        self.state.subscribe()
    }

    /// Stamps `record` with the current time, puts it first and persists.
    pub async fn add_entry(&self, record: Map<String, Value>) {
        let entry = HistoryEntry::new(record);
        self.state.send_modify(|history| history.prepend(entry));
        self.persist().await;
    }

    /// Removes the entry at `index` (0 = newest) and persists.
    ///
    /// An out-of-range index removes nothing; the history is still written.
    pub async fn delete_entry(&self, index: usize) {
        self.state.send_modify(|history| {
            if history.remove(index).is_none() {
                tracing::debug!("[HistoryStore] No entry at index {}", index);
            }
        });
        self.persist().await;
    }

    /// Removes every entry and persists the empty history.
    pub async fn clear_history(&self) {
        self.state.send_modify(History::clear);
        self.persist().await;
    }

    async fn persist(&self) {
        let snapshot = self.state.borrow().to_json();
        if let Err(e) = self.kv.set(&self.key, snapshot).await {
            tracing::error!("[HistoryStore] Failed to save history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqa_infrastructure::MemoryStore;
    use serde_json::json;

    fn record(question: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("question".to_string(), json!(question));
        map
    }

    #[tokio::test]
    async fn test_fresh_store_is_empty() {
        let store = HistoryStore::open(Arc::new(MemoryStore::new())).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_every_mutation_persists() {
        let kv = MemoryStore::new();
        let store = HistoryStore::open(Arc::new(kv.clone())).await;

        store.add_entry(record("a")).await;
        store.delete_entry(7).await;
        store.clear_history().await;

        assert_eq!(kv.writes(), 3);
        assert_eq!(kv.get(HISTORY_KEY).await.unwrap(), Some(json!([])));
    }

    #[tokio::test]
    async fn test_subscribers_see_new_entries() {
        let store = HistoryStore::open(Arc::new(MemoryStore::new())).await;
        let mut rx = store.subscribe();

        store.add_entry(record("watched")).await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().get(0).and_then(HistoryEntry::question), Some("watched"));
    }
}
